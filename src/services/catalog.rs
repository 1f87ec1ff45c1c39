use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::{AppError, AppResult},
    models::ClothingItem,
};

/// Owns clothing-item state: availability and wear frequency
///
/// All other components go through the catalog to read or mutate items, so
/// the rotation rules (least-worn-first ordering, atomic wear batches,
/// idempotent restoration) live in exactly one place.
pub struct ItemCatalog {
    store: Arc<dyn WardrobeStore>,
}

impl ItemCatalog {
    pub fn new(store: Arc<dyn WardrobeStore>) -> Self {
        Self { store }
    }

    /// Items the recommender may offer right now
    ///
    /// Only available items, ordered ascending by wear frequency so the
    /// least-worn pieces are offered first. Ties keep insertion order (the
    /// sort is stable over the store's ordering). An empty wardrobe returns
    /// an empty list, not an error; callers decide whether that is fatal.
    pub async fn eligible_items(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
        let mut items = self.store.items_by_owner(user_id).await?;
        items.retain(|item| item.available);
        items.sort_by_key(|item| item.frequency);

        Ok(items)
    }

    /// Marks a batch of items worn: unavailable, frequency bumped by one
    ///
    /// Resolves every id before mutating anything. If any id no longer
    /// exists the whole call fails with `NotFound` and no item is touched.
    pub async fn mark_used(&self, item_ids: &[Uuid]) -> AppResult<()> {
        // 1. Resolve all ids up front; this is the partial-failure checkpoint.
        let found = self.store.items_by_ids(item_ids).await?;
        let known: HashSet<Uuid> = found.iter().map(|item| item.id).collect();
        if let Some(missing) = item_ids.iter().find(|id| !known.contains(id)) {
            return Err(AppError::NotFound(format!(
                "Clothing item {missing} not found"
            )));
        }

        // 2. Commit the whole batch in one write.
        let touched = self.store.set_items_used(item_ids).await?;
        tracing::debug!(touched, "Marked items used");

        Ok(())
    }

    /// Returns a batch of items to the available pool
    ///
    /// Ids that no longer resolve are skipped silently; restoration must
    /// not fail because an item was deleted while it sat in the laundry.
    /// Re-marking an already available item is a no-op, so firing the same
    /// restoration twice is harmless.
    pub async fn mark_available(&self, item_ids: &[Uuid]) -> AppResult<()> {
        let touched = self.store.set_items_available(item_ids).await?;
        tracing::debug!(touched, "Marked items available");

        Ok(())
    }

    /// Resolves caller-supplied item ids for use as outfit anchors
    ///
    /// Every id must exist, belong to `user_id`, and be available; anything
    /// else is `NotFound`. Reusing an item that is still in the laundry is
    /// rejected here rather than silently merged into an armed restoration.
    /// Duplicates are collapsed, first occurrence wins.
    pub async fn resolve_selectable(
        &self,
        user_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<Vec<ClothingItem>> {
        let found = self.store.items_by_ids(item_ids).await?;

        let mut resolved = Vec::with_capacity(item_ids.len());
        let mut seen = HashSet::new();
        for id in item_ids {
            if !seen.insert(*id) {
                continue;
            }
            let item = found
                .iter()
                .find(|item| item.id == *id && item.user_id == user_id && item.available)
                .ok_or_else(|| AppError::NotFound(format!("Clothing item {id} not found")))?;
            resolved.push(item.clone());
        }

        Ok(resolved)
    }
}
