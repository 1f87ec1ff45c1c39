use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single piece of clothing in a user's wardrobe
///
/// `frequency` counts how many times the item has been worn and only ever
/// increases. `available` flips to `false` while the item sits in the
/// laundry cooldown and is flipped back by the rotation scheduler (or an
/// explicit restock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClothingItem {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Free-text description produced at ingestion time
    pub description: String,
    /// Number of times the item has been worn (never decreases)
    pub frequency: i32,
    /// Whether the item can currently be recommended
    pub available: bool,
    pub created_at: DateTime<Utc>,
    /// Store-assigned insertion counter; breaks frequency ties so the
    /// eligible ordering stays stable
    #[serde(skip_serializing, default)]
    pub seq: i64,
}

/// Fields supplied when ingesting a new item; the store assigns the id,
/// timestamps, and insertion counter, and starts the item available with
/// zero wears.
#[derive(Debug, Clone)]
pub struct NewClothingItem {
    pub user_id: Uuid,
    pub description: String,
}
