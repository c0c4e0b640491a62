//! # Change Storage
//!
//! In-memory storage engine for configuration-change records.
//!
//! The store is an explicit object: construct one at startup and hand it to
//! the HTTP layer as an `Arc<dyn ChangeStore>`. Records are kept in insertion
//! order and every operation is a linear scan.

mod filter;
mod memory;

pub use filter::ChangeFilter;
pub use memory::InMemoryChangeStore;

use std::fmt;

use uuid::Uuid;

use crate::model::ConfigChange;

/// Access contract for configuration-change storage.
///
/// Misses are normal results, never faults: `get`, `update` and `delete`
/// return `None` when no record has the requested id.
pub trait ChangeStore: Send + Sync + fmt::Debug {
    /// Insert a record.
    ///
    /// The caller guarantees `change.id` is freshly generated; uniqueness is
    /// not checked here.
    fn add(&self, change: ConfigChange);

    /// Current record for `id`
    fn get(&self, id: &Uuid) -> Option<ConfigChange>;

    /// Overwrite `rule_name`, `change_type` and `is_critical` of the record
    /// with `change.id` and reset its `changed_at` to now.
    ///
    /// Returns the updated record, or `None` (store untouched) if absent.
    fn update(&self, change: &ConfigChange) -> Option<ConfigChange>;

    /// Remove the record for `id`, returning it if it existed.
    fn delete(&self, id: &Uuid) -> Option<ConfigChange>;

    /// Every record, in insertion order
    fn get_all(&self) -> Vec<ConfigChange>;

    /// Records matching every criterion in `filter`, in insertion order
    fn list(&self, filter: &ChangeFilter) -> Vec<ConfigChange>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
