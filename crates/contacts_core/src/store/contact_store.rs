//! Contact store backed by the directory adapter.
//!
//! # Responsibility
//! - Trigger loads through `DirectoryAdapter` and publish their results.
//! - Keep the id index consistent with the published sequence.
//!
//! # Invariants
//! - The published sequence is sorted ascending by `family_name`, stable
//!   with respect to device order.
//! - Readers see either the old or the new snapshot, never a mix.
//! - A `load()` issued while another is pending is rejected.

use crate::directory::adapter::{DirectoryAdapter, DirectoryError};
use crate::model::contact::{Contact, ContactId};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another load on this store has not finished yet.
    LoadInProgress,
    Directory(DirectoryError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadInProgress => write!(f, "a contact load is already in progress"),
            Self::Directory(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LoadInProgress => None,
            Self::Directory(err) => Some(err),
        }
    }
}

impl From<DirectoryError> for StoreError {
    fn from(value: DirectoryError) -> Self {
        Self::Directory(value)
    }
}

/// Immutable published contents of the store.
#[derive(Debug)]
struct Snapshot {
    records: Arc<[Contact]>,
    index: HashMap<ContactId, usize>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            index: HashMap::new(),
        }
    }

    fn build(mut records: Vec<Contact>) -> Self {
        // `sort_by` is stable: equal family names keep device order.
        records.sort_by(|left, right| left.family_name().cmp(right.family_name()));

        let mut index = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;
        for (position, contact) in records.iter().enumerate() {
            if index.contains_key(&contact.id()) {
                duplicates += 1;
                continue;
            }
            index.insert(contact.id(), position);
        }
        if duplicates > 0 {
            warn!(
                "event=duplicate_contact_ids module=store status=warn duplicates={}",
                duplicates
            );
        }

        Self {
            records: records.into(),
            index,
        }
    }
}

/// Resets the pending-load flag when the load future finishes or is dropped.
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Ordered, id-indexed collection of contacts.
pub struct ContactStore {
    adapter: DirectoryAdapter,
    snapshot: RwLock<Arc<Snapshot>>,
    loading: AtomicBool,
}

impl ContactStore {
    /// Creates an empty store; nothing is loaded until `load()`.
    pub fn new(adapter: DirectoryAdapter) -> Self {
        Self {
            adapter,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            loading: AtomicBool::new(false),
        }
    }

    /// Repopulates the store from the device directory.
    ///
    /// Returns the number of records now held.
    ///
    /// # Errors
    /// - `LoadInProgress` when a previous load has not completed; that load is
    ///   not affected.
    /// - `Directory` when the adapter fails; prior contents are kept.
    pub async fn load(&self) -> StoreResult<usize> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("event=load_rejected module=store status=rejected reason=load_in_progress");
            return Err(StoreError::LoadInProgress);
        }
        let _guard = LoadGuard(&self.loading);

        let operation = self.adapter.load().await?;
        let operation_id = operation.id();
        let next = Arc::new(Snapshot::build(operation.into_records()));
        let count = next.records.len();
        self.publish(next);

        info!(
            "event=store_replaced module=store status=ok operation={} count={}",
            operation_id, count
        );
        Ok(count)
    }

    /// Whether a load is currently outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Returns the unique record with `id`, if loaded.
    pub fn get_by_id(&self, id: ContactId) -> Option<Contact> {
        let snapshot = self.current();
        let position = *snapshot.index.get(&id)?;
        snapshot.records.get(position).cloned()
    }

    /// Returns the record at list position `index`.
    pub fn get_at(&self, index: usize) -> Option<Contact> {
        self.current().records.get(index).cloned()
    }

    /// Read-only view of the ordered sequence.
    pub fn all(&self) -> Arc<[Contact]> {
        Arc::clone(&self.current().records)
    }

    pub fn len(&self) -> usize {
        self.current().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().records.is_empty()
    }

    fn current(&self) -> Arc<Snapshot> {
        let lock = &self.snapshot;
        let guard = lock.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    fn publish(&self, next: Arc<Snapshot>) {
        let lock = &self.snapshot;
        let mut guard = lock.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::contact::Contact;

    fn contact(id: i64, family_name: &str) -> Contact {
        Contact::new(id, "", "", family_name, Vec::new(), Vec::new())
    }

    #[test]
    fn snapshot_sorts_stably_by_family_name() {
        let snapshot = Snapshot::build(vec![
            contact(1, "Suzuki"),
            contact(2, "Abe"),
            contact(3, "Suzuki"),
            contact(4, ""),
        ]);
        let ids: Vec<_> = snapshot.records.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn snapshot_index_points_at_first_duplicate() {
        let snapshot = Snapshot::build(vec![contact(0, "Suzuki"), contact(0, "Abe")]);
        assert_eq!(snapshot.index.len(), 1);
        let position = snapshot.index[&0];
        assert_eq!(snapshot.records[position].family_name(), "Abe");
    }
}
