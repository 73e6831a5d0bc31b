//! In-memory store for tests and single-process development runs.
//!
//! Implements all three gateway traits over plain maps. Only the latest
//! snapshot is kept per key (the SQL store is the one that accumulates
//! dated history). Individual pets can be poisoned to exercise the
//! scheduler's per-pet failure isolation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use garden_types::{OwnerId, OwnerInventory, PetSnapshot, ViewKey, ViewStateRecord};

use crate::error::DbError;
use crate::store::{InventoryStore, PetStore, ViewStateStore};

/// In-memory implementation of the persistence gateway.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pets: Mutex<BTreeMap<(u64, String), PetSnapshot>>,
    inventories: Mutex<BTreeMap<u64, OwnerInventory>>,
    views: Mutex<BTreeMap<(u64, String), ViewStateRecord>>,
    poisoned: Mutex<BTreeSet<(u64, String)>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load and save for one pet fail, to exercise per-pet
    /// error isolation in the decay scheduler.
    pub fn poison(&self, owner: OwnerId, name: &str) {
        if let Ok(mut poisoned) = self.poisoned.lock() {
            poisoned.insert((owner.into_inner(), name.to_owned()));
        }
    }

    fn check_poison(&self, owner: OwnerId, name: &str) -> Result<(), DbError> {
        let poisoned = self
            .poisoned
            .lock()
            .map_err(|_| DbError::Store(String::from("poison set lock")))?;
        if poisoned.contains(&(owner.into_inner(), name.to_owned())) {
            return Err(DbError::Store(format!("simulated failure for {owner}/{name}")));
        }
        Ok(())
    }
}

impl PetStore for MemoryStore {
    async fn load_pet(&self, owner: OwnerId, name: &str) -> Result<Option<PetSnapshot>, DbError> {
        self.check_poison(owner, name)?;
        let pets = self
            .pets
            .lock()
            .map_err(|_| DbError::Store(String::from("pet map lock")))?;
        Ok(pets.get(&(owner.into_inner(), name.to_owned())).cloned())
    }

    async fn save_pet(&self, owner: OwnerId, snapshot: &PetSnapshot) -> Result<(), DbError> {
        self.check_poison(owner, &snapshot.name)?;
        let mut pets = self
            .pets
            .lock()
            .map_err(|_| DbError::Store(String::from("pet map lock")))?;
        pets.insert((owner.into_inner(), snapshot.name.clone()), snapshot.clone());
        Ok(())
    }

    async fn list_pets(&self) -> Result<Vec<(OwnerId, String)>, DbError> {
        let pets = self
            .pets
            .lock()
            .map_err(|_| DbError::Store(String::from("pet map lock")))?;
        Ok(pets
            .keys()
            .map(|(owner, name)| (OwnerId::new(*owner), name.clone()))
            .collect())
    }
}

impl InventoryStore for MemoryStore {
    async fn load_inventory(&self, owner: OwnerId) -> Result<OwnerInventory, DbError> {
        let inventories = self
            .inventories
            .lock()
            .map_err(|_| DbError::Store(String::from("inventory map lock")))?;
        Ok(inventories.get(&owner.into_inner()).cloned().unwrap_or_default())
    }

    async fn save_inventory(&self, owner: OwnerId, inventory: &OwnerInventory) -> Result<(), DbError> {
        let mut inventories = self
            .inventories
            .lock()
            .map_err(|_| DbError::Store(String::from("inventory map lock")))?;
        inventories.insert(owner.into_inner(), inventory.clone());
        Ok(())
    }
}

impl ViewStateStore for MemoryStore {
    async fn load_view(&self, owner: OwnerId, key: &ViewKey) -> Result<Option<ViewStateRecord>, DbError> {
        let views = self
            .views
            .lock()
            .map_err(|_| DbError::Store(String::from("view map lock")))?;
        Ok(views.get(&(owner.into_inner(), key.to_string())).cloned())
    }

    async fn save_view(
        &self,
        owner: OwnerId,
        key: &ViewKey,
        record: &ViewStateRecord,
    ) -> Result<(), DbError> {
        let mut views = self
            .views
            .lock()
            .map_err(|_| DbError::Store(String::from("view map lock")))?;
        views.insert((owner.into_inner(), key.to_string()), record.clone());
        Ok(())
    }

    async fn clear_view(&self, owner: OwnerId, key: &ViewKey) -> Result<(), DbError> {
        let mut views = self
            .views
            .lock()
            .map_err(|_| DbError::Store(String::from("view map lock")))?;
        views.remove(&(owner.into_inner(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use garden_types::Grade;

    use super::*;

    fn snapshot(name: &str) -> PetSnapshot {
        let born = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
        PetSnapshot::fresh(name.to_owned(), [Grade::D; 5], born)
    }

    #[tokio::test]
    async fn load_returns_latest_save() {
        let store = MemoryStore::new();
        let owner = OwnerId::new(1);
        let mut pet = snapshot("cheese");
        assert!(store.save_pet(owner, &pet).await.is_ok());

        pet.run.level = 9;
        assert!(store.save_pet(owner, &pet).await.is_ok());

        let loaded = store.load_pet(owner, "cheese").await.ok().flatten();
        assert_eq!(loaded.map(|p| p.run.level), Some(9));
    }

    #[tokio::test]
    async fn missing_pet_loads_none() {
        let store = MemoryStore::new();
        let loaded = store.load_pet(OwnerId::new(1), "ghost").await.ok().flatten();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn list_all_spans_owners() {
        let store = MemoryStore::new();
        assert!(store.save_pet(OwnerId::new(1), &snapshot("a")).await.is_ok());
        assert!(store.save_pet(OwnerId::new(2), &snapshot("b")).await.is_ok());
        let all = store.list_pets().await.unwrap_or_default();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn poisoned_pet_fails_loads_and_saves() {
        let store = MemoryStore::new();
        let owner = OwnerId::new(7);
        assert!(store.save_pet(owner, &snapshot("glitch")).await.is_ok());
        store.poison(owner, "glitch");
        assert!(store.load_pet(owner, "glitch").await.is_err());
        assert!(store.save_pet(owner, &snapshot("glitch")).await.is_err());
        // Other pets are unaffected.
        assert!(store.save_pet(owner, &snapshot("fine")).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_inventory_is_empty() {
        let store = MemoryStore::new();
        let inventory = store.load_inventory(OwnerId::new(3)).await.unwrap_or_default();
        assert_eq!(inventory.rings, 0);
        assert!(inventory.items.is_empty());
    }

    #[tokio::test]
    async fn view_state_roundtrip_and_clear() {
        let store = MemoryStore::new();
        let owner = OwnerId::new(4);
        let key = ViewKey::Pet(String::from("cheese"));
        let record = ViewStateRecord {
            payload: serde_json::json!({"page": 3}),
            updated_at: Utc.timestamp_opt(50, 0).single().unwrap_or_default(),
        };
        assert!(store.save_view(owner, &key, &record).await.is_ok());
        let loaded = store.load_view(owner, &key).await.ok().flatten();
        assert_eq!(loaded, Some(record));
        assert!(store.clear_view(owner, &key).await.is_ok());
        let loaded = store.load_view(owner, &key).await.ok().flatten();
        assert!(loaded.is_none());
    }
}
