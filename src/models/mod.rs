use serde::{Deserialize, Serialize};

pub mod clothing_item;
pub mod outfit;
pub mod user;

pub use clothing_item::{ClothingItem, NewClothingItem};
pub use outfit::{NewOutfit, Outfit, OutfitDraft, OutfitWithItems, UseOutfitReceipt};
pub use user::{NewUser, User};

/// Situational context forwarded to the prompt alongside the wearer's
/// stored profile. All fields are optional; the generator copes with
/// whatever subset the client supplies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendContext {
    /// Short weather description, e.g. "light rain"
    pub weather: Option<String>,
    /// Current temperature in degrees Celsius
    pub temperature_c: Option<f64>,
    /// Free-text description of the day ahead, e.g. "office, then dinner out"
    pub day_description: Option<String>,
    /// Extra style preferences for this request, merged after the
    /// wearer's stored preferences
    #[serde(default)]
    pub preferences: Vec<String>,
}
