use leadline_protocol::lead::{LeadId, LeadPatch, LeadRecord, NewLead};

use crate::error::StoreError;

/// Durable table of lead records.
///
/// Implementations assign identities, stamp provenance and tombstones from
/// their clock, and apply each mutation to one whole record under a single
/// lock. Unknown identities are reported as `Ok(false)`, never as errors.
pub trait LeadStore: Send + Sync {
    /// Stores a new lead and returns its freshly assigned identity.
    fn insert(&self, lead: NewLead, created_by: &str) -> Result<LeadId, StoreError>;

    /// Merges `patch` into the lead. `Ok(false)` when the identity is unknown.
    fn update(&self, id: LeadId, patch: &LeadPatch) -> Result<bool, StoreError>;

    /// Builds a patch from the lead as currently stored and applies it, with
    /// the read and the write under one lock. `Ok(false)` when the lead is
    /// unknown or already deleted; a `None` patch leaves the lead untouched.
    fn update_active(
        &self,
        id: LeadId,
        patch_for: &dyn Fn(&LeadRecord) -> Option<LeadPatch>,
    ) -> Result<bool, StoreError>;

    /// Tombstones the lead. `Ok(false)` when unknown or already deleted.
    fn soft_delete(&self, id: LeadId, deleted_by: &str) -> Result<bool, StoreError>;

    /// Fetches a single lead, active or deleted.
    fn get(&self, id: LeadId) -> Result<Option<LeadRecord>, StoreError>;

    /// Every lead, active and deleted, in store order.
    fn all(&self) -> Result<Vec<LeadRecord>, StoreError>;
}

/// Checks performed before any insert reaches a backend.
pub(crate) fn validate_insert(lead: &NewLead, created_by: &str) -> Result<(), StoreError> {
    if let Some(field) = lead.missing_required_field() {
        return Err(StoreError::required(field));
    }
    if created_by.trim().is_empty() {
        return Err(StoreError::required("created_by"));
    }
    Ok(())
}

/// A tombstone must name who deleted the lead.
pub(crate) fn validate_deleter(deleted_by: &str) -> Result<(), StoreError> {
    if deleted_by.trim().is_empty() {
        return Err(StoreError::required("deleted_by"));
    }
    Ok(())
}
