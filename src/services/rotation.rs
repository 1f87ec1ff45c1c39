use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::{AppError, AppResult},
    models::UseOutfitReceipt,
    services::{
        catalog::ItemCatalog,
        scheduler::{DeferredScheduler, RestorationJob, RestorationTask},
    },
};

/// Hours an item stays in the laundry after being worn.
pub const COOLDOWN_HOURS: i64 = 48;

/// Drives the wear/restore cycle
///
/// Per item the lifecycle is `Available -> (use) -> InLaundry -> (cooldown
/// elapses) -> Available`. Wearing an outfit flips all its items in one
/// atomic batch and arms exactly one restoration task; the armed task later
/// restores exactly those items. Firing is at-least-once safe because
/// restoring an already available item changes nothing.
pub struct RotationScheduler {
    store: Arc<dyn WardrobeStore>,
    catalog: Arc<ItemCatalog>,
    scheduler: Arc<dyn DeferredScheduler>,
}

impl RotationScheduler {
    pub fn new(
        store: Arc<dyn WardrobeStore>,
        catalog: Arc<ItemCatalog>,
        scheduler: Arc<dyn DeferredScheduler>,
    ) -> Self {
        Self {
            store,
            catalog,
            scheduler,
        }
    }

    /// Records that the user wore an outfit
    ///
    /// The outfit must belong to the user. Item references that no longer
    /// resolve are skipped, and items already in the laundry are not worn
    /// again (their running cooldown stands, so no two armed tasks ever
    /// cover the same item). An outfit with nothing left to wear is
    /// `NotFound`. Returns before the cooldown timer is awaited; the
    /// receipt says which items went into the laundry and when they
    /// return.
    pub async fn use_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<UseOutfitReceipt> {
        // 1. The outfit itself, scoped to its owner.
        let outfit = self
            .store
            .outfit_by_id(user_id, outfit_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Outfit {outfit_id} not found")))?;

        // 2. Resolve its item references to currently wearable items.
        let items = self.store.items_by_ids(&outfit.clothing_item_ids).await?;
        let item_ids: Vec<Uuid> = items
            .iter()
            .filter(|item| item.available)
            .map(|item| item.id)
            .collect();
        if item_ids.is_empty() {
            return Err(AppError::NotFound(format!(
                "Outfit {outfit_id} has no wearable items"
            )));
        }

        // 3. Flip the whole batch into the laundry.
        self.catalog.mark_used(&item_ids).await?;

        // 4. Arm one restoration task covering exactly those ids.
        let restore_at = Utc::now() + Duration::hours(COOLDOWN_HOURS);
        let task = RestorationTask {
            item_ids: item_ids.clone(),
            restore_at,
        };
        self.scheduler.schedule(task, self.restoration_job());

        tracing::info!(
            outfit_id = %outfit_id,
            items = item_ids.len(),
            restore_at = %restore_at,
            "Outfit used"
        );

        Ok(UseOutfitReceipt {
            outfit_id,
            item_ids,
            restore_at,
        })
    }

    /// Callback run at fire time. Failures are logged, not propagated;
    /// there is no caller left to report to.
    fn restoration_job(&self) -> RestorationJob {
        let catalog = Arc::clone(&self.catalog);
        Arc::new(move |item_ids| {
            let catalog = Arc::clone(&catalog);
            Box::pin(async move {
                if let Err(e) = catalog.mark_available(&item_ids).await {
                    tracing::error!(
                        error = %e,
                        items = item_ids.len(),
                        "Restoration failed, items stay in the laundry"
                    );
                }
            })
        })
    }
}
