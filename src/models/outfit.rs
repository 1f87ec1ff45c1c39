use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClothingItem;

/// A persisted outfit proposal
///
/// Immutable after creation; "using" an outfit mutates the referenced
/// clothing items, never the outfit itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Outfit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    /// Ordered ids of the items making up the outfit (non-empty at creation)
    pub clothing_item_ids: Vec<Uuid>,
    pub styling_tips: String,
    pub created_at: DateTime<Utc>,
    /// Store-assigned insertion counter; breaks created_at ties when
    /// listing the most recent outfits
    #[serde(skip_serializing, default)]
    pub seq: i64,
}

/// Fields supplied when persisting an accepted draft
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub clothing_item_ids: Vec<Uuid>,
    pub styling_tips: String,
}

/// An outfit proposal as decoded from the generator's reply, before any
/// id resolution or persistence
///
/// Item ids stay raw strings here: the generator is only instructed to echo
/// catalog ids back, so anything it invents is filtered out downstream
/// rather than trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitDraft {
    pub name: String,
    pub description: String,
    pub clothing_item_ids: Vec<String>,
    #[serde(default)]
    pub styling_tips: String,
}

/// An outfit with its referenced clothing items resolved and inlined for
/// direct display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitWithItems {
    #[serde(flatten)]
    pub outfit: Outfit,
    /// Resolved items; references that no longer resolve are dropped
    pub items: Vec<ClothingItem>,
}

/// What "wearing an outfit" actually did: which items went into the
/// laundry cooldown, and when they come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseOutfitReceipt {
    pub outfit_id: Uuid,
    pub item_ids: Vec<Uuid>,
    pub restore_at: DateTime<Utc>,
}
