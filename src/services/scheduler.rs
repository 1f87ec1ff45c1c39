use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A one-shot restoration order: which items come back, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct RestorationTask {
    pub item_ids: Vec<Uuid>,
    pub restore_at: DateTime<Utc>,
}

/// Callback a scheduler runs when a restoration task fires.
pub type RestorationJob =
    Arc<dyn Fn(Vec<Uuid>) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Trait for deferred-task schedulers
///
/// The rotation layer only supplies the (fire time, item-id set) pair and
/// the restoration callback; timer mechanics live behind this trait.
#[cfg_attr(test, mockall::automock)]
pub trait DeferredScheduler: Send + Sync {
    /// Arms `task` so that `job` runs with the task's item ids at
    /// `restore_at`. Must return immediately, never block until fire time.
    fn schedule(&self, task: RestorationTask, job: RestorationJob);
}

/// Timer-based scheduler on the tokio runtime
///
/// Each armed task is a spawned sleep. Tasks already past due fire right
/// away. Armed tasks do not survive a process restart; a durable scheduler
/// would have to take this trait's place for that guarantee.
pub struct TokioScheduler;

impl DeferredScheduler for TokioScheduler {
    fn schedule(&self, task: RestorationTask, job: RestorationJob) {
        let delay = (task.restore_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let deadline = tokio::time::Instant::now() + delay;

        tracing::info!(
            items = task.item_ids.len(),
            restore_at = %task.restore_at,
            "Restoration task armed"
        );

        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::info!(items = task.item_ids.len(), "Restoration task firing");
            job(task.item_ids).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    fn job_sending_to(tx: oneshot::Sender<Vec<Uuid>>) -> RestorationJob {
        let tx = Mutex::new(Some(tx));
        Arc::new(move |item_ids| {
            let tx = tx.lock().unwrap().take();
            Box::pin(async move {
                if let Some(tx) = tx {
                    let _ = tx.send(item_ids);
                }
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_with_exactly_the_armed_item_ids() {
        let (tx, rx) = oneshot::channel();
        let item_ids = vec![Uuid::new_v4(), Uuid::new_v4()];

        TokioScheduler.schedule(
            RestorationTask {
                item_ids: item_ids.clone(),
                restore_at: Utc::now() + chrono::Duration::hours(48),
            },
            job_sending_to(tx),
        );

        // Paused clock fast-forwards through the 48 h sleep.
        let fired = rx.await.unwrap();
        assert_eq!(fired, item_ids);
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_fire_before_restore_time() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx_job: RestorationJob = Arc::new(move |item_ids| {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(item_ids);
            })
        });

        TokioScheduler.schedule(
            RestorationTask {
                item_ids: vec![Uuid::new_v4()],
                restore_at: Utc::now() + chrono::Duration::hours(48),
            },
            tx_job,
        );

        tokio::time::advance(Duration::from_secs(47 * 3600)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err(), "fired an hour early");

        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_due_task_fires_immediately() {
        let (tx, rx) = oneshot::channel();

        TokioScheduler.schedule(
            RestorationTask {
                item_ids: vec![Uuid::new_v4()],
                restore_at: Utc::now() - chrono::Duration::hours(1),
            },
            job_sending_to(tx),
        );

        assert!(rx.await.is_ok());
    }
}
