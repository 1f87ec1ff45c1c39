use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::AppResult,
    models::{ClothingItem, NewClothingItem, NewOutfit, NewUser, Outfit, User},
};

/// In-memory wardrobe store
///
/// Hash maps behind a single `RwLock`, so batch mutations hold the write
/// guard for their whole pass and stay atomic. Used by the test suites and
/// handy for local development without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<Uuid, User>,
    items: HashMap<Uuid, ClothingItem>,
    outfits: HashMap<Uuid, Outfit>,
    next_seq: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInner {
    fn bump_seq(&mut self) -> i64 {
        self.next_seq += 1;
        self.next_seq
    }
}

#[async_trait::async_trait]
impl WardrobeStore for MemoryStore {
    async fn insert_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            age: new_user.age,
            gender: new_user.gender,
            preferences: new_user.preferences,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn insert_item(&self, new_item: NewClothingItem) -> AppResult<ClothingItem> {
        let mut inner = self.inner.write().await;
        let seq = inner.bump_seq();
        let item = ClothingItem {
            id: Uuid::new_v4(),
            user_id: new_item.user_id,
            description: new_item.description,
            frequency: 0,
            available: true,
            created_at: Utc::now(),
            seq,
        };
        inner.items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn items_by_owner(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<ClothingItem> = inner
            .items
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.seq);

        Ok(items)
    }

    async fn items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ClothingItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<ClothingItem> =
            ids.iter().filter_map(|id| inner.items.get(id)).cloned().collect();
        items.sort_by_key(|i| i.seq);

        Ok(items)
    }

    async fn set_items_used(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let mut touched = 0;
        for id in ids {
            if let Some(item) = inner.items.get_mut(id) {
                item.available = false;
                item.frequency += 1;
                touched += 1;
            }
        }

        Ok(touched)
    }

    async fn set_items_available(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let mut touched = 0;
        for id in ids {
            if let Some(item) = inner.items.get_mut(id) {
                item.available = true;
                touched += 1;
            }
        }

        Ok(touched)
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .items
            .get(&item_id)
            .is_some_and(|i| i.user_id == user_id);
        if owned {
            inner.items.remove(&item_id);
        }

        Ok(owned)
    }

    async fn insert_outfit(&self, new_outfit: NewOutfit) -> AppResult<Outfit> {
        let mut inner = self.inner.write().await;
        let seq = inner.bump_seq();
        let outfit = Outfit {
            id: Uuid::new_v4(),
            user_id: new_outfit.user_id,
            name: new_outfit.name,
            description: new_outfit.description,
            clothing_item_ids: new_outfit.clothing_item_ids,
            styling_tips: new_outfit.styling_tips,
            created_at: Utc::now(),
            seq,
        };
        inner.outfits.insert(outfit.id, outfit.clone());

        Ok(outfit)
    }

    async fn outfit_by_id(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<Outfit>> {
        let inner = self.inner.read().await;
        Ok(inner
            .outfits
            .get(&outfit_id)
            .filter(|o| o.user_id == user_id)
            .cloned())
    }

    async fn recent_outfits(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Outfit>> {
        let inner = self.inner.read().await;
        let mut outfits: Vec<Outfit> = inner
            .outfits
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        outfits.sort_by(|a, b| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));
        outfits.truncate(limit.max(0) as usize);

        Ok(outfits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(user_id: Uuid, description: &str) -> NewClothingItem {
        NewClothingItem {
            user_id,
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn items_come_back_in_insertion_order() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        for label in ["first", "second", "third"] {
            store.insert_item(new_item(user_id, label)).await.unwrap();
        }

        let items = store.items_by_owner(user_id).await.unwrap();
        let labels: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn set_items_used_flips_and_counts() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let item = store.insert_item(new_item(user_id, "wool coat")).await.unwrap();

        let touched = store
            .set_items_used(&[item.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(touched, 1);

        let stored = &store.items_by_ids(&[item.id]).await.unwrap()[0];
        assert!(!stored.available);
        assert_eq!(stored.frequency, 1);
    }

    #[tokio::test]
    async fn delete_item_checks_ownership() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let item = store.insert_item(new_item(owner, "scarf")).await.unwrap();

        assert!(!store.delete_item(Uuid::new_v4(), item.id).await.unwrap());
        assert!(store.delete_item(owner, item.id).await.unwrap());
        assert!(store.items_by_ids(&[item.id]).await.unwrap().is_empty());
    }
}
