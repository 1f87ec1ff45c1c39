use sqlx::PgPool;
use uuid::Uuid;

/// Wardrobe persistence abstraction
///
/// Storage is treated as an opaque document store: callers hand over whole
/// records and get whole records back, and every method is a single
/// round-trip. Policy (ownership checks, eligibility, cooldowns) lives in
/// the catalog and service layers, not here.
use crate::{
    error::AppResult,
    models::{ClothingItem, NewClothingItem, NewOutfit, NewUser, Outfit, User},
};

/// Trait for wardrobe storage backends
///
/// Batch mutations (`set_items_used`, `set_items_available`) must apply as
/// a single atomic write; partial application would leave the wardrobe in a
/// state no caller ever requested.
#[async_trait::async_trait]
pub trait WardrobeStore: Send + Sync {
    /// Insert a registered user, returning the stored record.
    async fn insert_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Look up a user by email (case-sensitive).
    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up a user by id.
    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert a clothing item, returning the stored record.
    ///
    /// New items start available with zero wears; the store assigns the id,
    /// timestamp, and insertion counter.
    async fn insert_item(&self, new_item: NewClothingItem) -> AppResult<ClothingItem>;

    /// All items owned by a user, in insertion order.
    async fn items_by_owner(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>>;

    /// The subset of `ids` that exist, in insertion order.
    ///
    /// Unknown ids are simply absent from the result; callers that need
    /// all-or-nothing semantics compare lengths themselves.
    async fn items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ClothingItem>>;

    /// Mark a batch of items worn: unavailable, frequency bumped by one.
    ///
    /// Returns the number of rows touched.
    async fn set_items_used(&self, ids: &[Uuid]) -> AppResult<u64>;

    /// Mark a batch of items available again. Ids that no longer exist are
    /// skipped. Returns the number of rows touched.
    async fn set_items_available(&self, ids: &[Uuid]) -> AppResult<u64>;

    /// Delete an item if it exists and belongs to `user_id`.
    ///
    /// Returns `true` if a row was removed.
    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool>;

    /// Persist an accepted outfit, returning the stored record.
    async fn insert_outfit(&self, new_outfit: NewOutfit) -> AppResult<Outfit>;

    /// Look up an outfit by id, scoped to its owner.
    async fn outfit_by_id(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<Outfit>>;

    /// The user's most recently created outfits, newest first.
    async fn recent_outfits(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Outfit>>;
}

/// Column lists shared across queries to avoid repetition.
const USER_COLUMNS: &str = "id, email, password_hash, name, age, gender, preferences, created_at";
const ITEM_COLUMNS: &str = "id, user_id, description, frequency, available, created_at, seq";
const OUTFIT_COLUMNS: &str =
    "id, user_id, name, description, clothing_item_ids, styling_tips, created_at, seq";

/// PostgreSQL-backed wardrobe store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WardrobeStore for PgStore {
    async fn insert_user(&self, new_user: NewUser) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (email, password_hash, name, age, gender, preferences)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .bind(new_user.age)
            .bind(&new_user.gender)
            .bind(&new_user.preferences)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn insert_item(&self, new_item: NewClothingItem) -> AppResult<ClothingItem> {
        let query = format!(
            "INSERT INTO clothing_items (user_id, description)
             VALUES ($1, $2)
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, ClothingItem>(&query)
            .bind(new_item.user_id)
            .bind(&new_item.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(item)
    }

    async fn items_by_owner(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM clothing_items WHERE user_id = $1 ORDER BY seq");
        let items = sqlx::query_as::<_, ClothingItem>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ClothingItem>> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM clothing_items WHERE id = ANY($1) ORDER BY seq");
        let items = sqlx::query_as::<_, ClothingItem>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn set_items_used(&self, ids: &[Uuid]) -> AppResult<u64> {
        // One statement for the whole batch, so the flip is all-or-nothing.
        let result = sqlx::query(
            "UPDATE clothing_items
             SET available = FALSE, frequency = frequency + 1
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn set_items_available(&self, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query("UPDATE clothing_items SET available = TRUE WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clothing_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_outfit(&self, new_outfit: NewOutfit) -> AppResult<Outfit> {
        let query = format!(
            "INSERT INTO outfits (user_id, name, description, clothing_item_ids, styling_tips)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {OUTFIT_COLUMNS}"
        );
        let outfit = sqlx::query_as::<_, Outfit>(&query)
            .bind(new_outfit.user_id)
            .bind(&new_outfit.name)
            .bind(&new_outfit.description)
            .bind(&new_outfit.clothing_item_ids)
            .bind(&new_outfit.styling_tips)
            .fetch_one(&self.pool)
            .await?;

        Ok(outfit)
    }

    async fn outfit_by_id(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<Outfit>> {
        let query = format!("SELECT {OUTFIT_COLUMNS} FROM outfits WHERE id = $1 AND user_id = $2");
        let outfit = sqlx::query_as::<_, Outfit>(&query)
            .bind(outfit_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(outfit)
    }

    async fn recent_outfits(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Outfit>> {
        let query = format!(
            "SELECT {OUTFIT_COLUMNS} FROM outfits
             WHERE user_id = $1
             ORDER BY created_at DESC, seq DESC
             LIMIT $2"
        );
        let outfits = sqlx::query_as::<_, Outfit>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(outfits)
    }
}
