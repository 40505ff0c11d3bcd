use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tracing::debug;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any keyed record must implement to be held by a [`Store`]
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type Patch: Send + Sync + Debug;

    /// The key of the record a patch targets
    fn patch_target(patch: &Self::Patch) -> &Self::Id;

    /// Default record for an identifier seen for the first time
    fn from_id(id: Self::Id) -> Self;

    /// Merge a patch into the record. Fields the patch leaves out stay as they are.
    fn on_update(&mut self, patch: &Self::Patch);
}

// =============================================================================
// 2. THE GENERIC STORE
// =============================================================================

/// Concurrency-safe keyed store with merge-on-apply semantics.
///
/// All records live in one map behind a single reader/writer lock: lookups
/// share the lock, applies take it exclusively, so a reader sees a record
/// either before or after an apply and never in between.
pub struct Store<T: Entity> {
    records: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Store<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Merge `patch` into its target record, creating the record if absent.
    pub fn apply(&self, patch: &T::Patch) {
        let id = T::patch_target(patch);
        let mut records = self.records.write();

        if let Some(record) = records.get_mut(id) {
            record.on_update(patch);
            return;
        }

        let mut record = T::from_id(id.clone());
        record.on_update(patch);
        records.insert(id.clone(), record);
        debug!(id = %id, "Record created");
    }

    /// Snapshot of the record for `id`, or `None` if nothing was applied for it yet.
    pub fn get<Q>(&self, id: &Q) -> Option<T>
    where
        T::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

// =============================================================================
// 3. EXAMPLE USAGE (Test)
// =============================================================================
