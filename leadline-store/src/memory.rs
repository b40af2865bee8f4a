use std::collections::BTreeMap;
use std::sync::Arc;

use leadline_core::Clock;
use leadline_protocol::lead::{LeadId, LeadPatch, LeadRecord, NewLead};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{validate_deleter, validate_insert, LeadStore};

#[derive(Default)]
struct MemoryState {
    last_id: LeadId,
    records: BTreeMap<LeadId, LeadRecord>,
}

/// In-process lead store. Clones share the same records.
#[derive(Clone)]
pub struct MemoryLeadStore {
    inner: Arc<RwLock<MemoryState>>,
    clock: Arc<dyn Clock>,
}

impl MemoryLeadStore {
    /// Creates a new empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryState::default())),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeadStore for MemoryLeadStore {
    fn insert(&self, lead: NewLead, created_by: &str) -> Result<LeadId, StoreError> {
        validate_insert(&lead, created_by)?;
        let mut inner = self.inner.write();
        let id = inner.last_id + 1;
        let record = LeadRecord::from_new(id, lead, created_by.trim(), self.clock.now());
        inner.records.insert(id, record);
        inner.last_id = id;
        debug!(lead_id = id, created_by, "lead inserted");
        Ok(id)
    }

    fn update(&self, id: LeadId, patch: &LeadPatch) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        match inner.records.get_mut(&id) {
            Some(record) => {
                patch.apply_to(record);
                debug!(lead_id = id, "lead updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_active(
        &self,
        id: LeadId,
        patch_for: &dyn Fn(&LeadRecord) -> Option<LeadPatch>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let Some(record) = inner.records.get_mut(&id) else {
            return Ok(false);
        };
        if record.deleted {
            debug!(lead_id = id, "update skipped, lead is in the trash");
            return Ok(false);
        }
        if let Some(patch) = patch_for(record) {
            patch.apply_to(record);
            debug!(lead_id = id, "lead updated");
        }
        Ok(true)
    }

    fn soft_delete(&self, id: LeadId, deleted_by: &str) -> Result<bool, StoreError> {
        validate_deleter(deleted_by)?;
        let now = self.clock.now();
        let mut inner = self.inner.write();
        let deleted = inner
            .records
            .get_mut(&id)
            .map(|record| record.mark_deleted(deleted_by.trim(), now))
            .unwrap_or(false);
        if deleted {
            debug!(lead_id = id, deleted_by, "lead moved to trash");
        }
        Ok(deleted)
    }

    fn get(&self, id: LeadId) -> Result<Option<LeadRecord>, StoreError> {
        Ok(self.inner.read().records.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<LeadRecord>, StoreError> {
        Ok(self.inner.read().records.values().cloned().collect())
    }
}
