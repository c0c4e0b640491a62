//! In-memory change store
//!
//! Records live in a `Vec` behind an `RwLock`. Nothing survives a restart.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{ChangeFilter, ChangeStore};
use crate::model::ConfigChange;

/// Change store backed by an insertion-ordered `Vec`
#[derive(Debug, Default)]
pub struct InMemoryChangeStore {
    changes: RwLock<Vec<ConfigChange>>,
}

impl InMemoryChangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write leaves the Vec consistent, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Vec<ConfigChange>> {
        self.changes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ConfigChange>> {
        self.changes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChangeStore for InMemoryChangeStore {
    fn add(&self, change: ConfigChange) {
        self.write().push(change);
    }

    fn get(&self, id: &Uuid) -> Option<ConfigChange> {
        self.read().iter().find(|c| c.id == *id).cloned()
    }

    fn update(&self, change: &ConfigChange) -> Option<ConfigChange> {
        let mut changes = self.write();
        let existing = changes.iter_mut().find(|c| c.id == change.id)?;

        existing.rule_name.clone_from(&change.rule_name);
        existing.change_type = change.change_type;
        existing.is_critical = change.is_critical;
        existing.changed_at = Utc::now();

        Some(existing.clone())
    }

    fn delete(&self, id: &Uuid) -> Option<ConfigChange> {
        let mut changes = self.write();
        let idx = changes.iter().position(|c| c.id == *id)?;
        Some(changes.remove(idx))
    }

    fn get_all(&self) -> Vec<ConfigChange> {
        self.read().clone()
    }

    fn list(&self, filter: &ChangeFilter) -> Vec<ConfigChange> {
        self.read()
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;

    fn sample(rule_name: &str) -> ConfigChange {
        ConfigChange::new(rule_name, ChangeType::Add, false, Utc::now())
    }

    #[test]
    fn test_add_then_get() {
        let store = InMemoryChangeStore::new();
        let change = sample("TestRule");
        store.add(change.clone());

        assert_eq!(store.get(&change.id), Some(change));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = InMemoryChangeStore::new();
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_modifies_in_place() {
        let store = InMemoryChangeStore::new();
        let mut change = sample("Before");
        store.add(change.clone());

        change.rule_name = "After".to_string();
        change.change_type = ChangeType::Update;
        change.is_critical = true;
        let updated = store.update(&change).unwrap();

        assert_eq!(updated.id, change.id);
        assert_eq!(updated.rule_name, "After");
        assert_eq!(updated.change_type, ChangeType::Update);
        assert!(updated.is_critical);
        assert_eq!(store.get(&change.id), Some(updated));
    }

    #[test]
    fn test_update_missing_is_noop() {
        let store = InMemoryChangeStore::new();
        store.add(sample("Kept"));

        assert!(store.update(&sample("Ghost")).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_all()[0].rule_name, "Kept");
    }

    #[test]
    fn test_delete_removes() {
        let store = InMemoryChangeStore::new();
        let change = sample("ToDelete");
        store.add(change.clone());

        assert_eq!(store.delete(&change.id), Some(change.clone()));
        assert!(store.get(&change.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = InMemoryChangeStore::new();
        store.add(sample("Kept"));

        assert!(store.delete(&Uuid::new_v4()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_all_keeps_insertion_order() {
        let store = InMemoryChangeStore::new();
        for name in ["first", "second", "third"] {
            store.add(sample(name));
        }

        let names: Vec<_> = store.get_all().into_iter().map(|c| c.rule_name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = InMemoryChangeStore::new();
        assert!(store.get_all().is_empty());
        assert!(store.list(&ChangeFilter::all()).is_empty());
    }
}
