use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use leadline_core::{Clock, CoreResult, LeadlineError, MonthScope};
use leadline_protocol::lead::{
    CallStatus, Caller, FollowupLog, FollowupStatus, LeadFilter, LeadId, LeadPatch, LeadRecord,
    LeadReport, LeadStatus, LeadTemperature, MonthFilter, NewLead, View,
};
use leadline_store::LeadStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::{self, CreatorScope};
use crate::{filter, followup, report};

/// Changes a caller makes to an existing lead.
///
/// Unlike [`LeadPatch`] this never carries a whole follow-up log: a note is
/// appended to the stored history with the current time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadUpdate {
    #[serde(default)]
    pub lead_status: Option<LeadStatus>,
    #[serde(default)]
    pub call_status: Option<CallStatus>,
    #[serde(default)]
    pub lead_temperature: Option<LeadTemperature>,
    #[serde(default)]
    pub followup_status: Option<FollowupStatus>,
    /// `Some(None)` clears the scheduled date.
    #[serde(default)]
    pub next_followup: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub note: Option<String>,
}

impl LeadUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lead_status(mut self, status: LeadStatus) -> Self {
        self.lead_status = Some(status);
        self
    }

    pub fn call_status(mut self, status: CallStatus) -> Self {
        self.call_status = Some(status);
        self
    }

    pub fn lead_temperature(mut self, temperature: LeadTemperature) -> Self {
        self.lead_temperature = Some(temperature);
        self
    }

    pub fn followup_status(mut self, status: FollowupStatus) -> Self {
        self.followup_status = Some(status);
        self
    }

    pub fn next_followup(mut self, date: Option<NaiveDate>) -> Self {
        self.next_followup = Some(date);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    fn to_patch(&self, history: &FollowupLog, now: NaiveDateTime) -> LeadPatch {
        let mut patch = LeadPatch {
            lead_status: self.lead_status,
            call_status: self.call_status,
            lead_temperature: self.lead_temperature,
            followup_status: self.followup_status,
            last_followup: Some(now),
            next_followup: self.next_followup,
            followup_notes: None,
        };
        if let Some(note) = self.note.as_deref() {
            let mut log = history.clone();
            if log.append(now, note) {
                patch.followup_notes = Some(log);
            }
        }
        patch
    }
}

/// Entry point for every lead operation a caller can perform.
///
/// Wraps a [`LeadStore`] and applies visibility, creator scope and the
/// configured month scope before handing snapshots to the pure engine
/// functions.
pub struct LeadService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    month_scope: MonthScope,
}

impl<S: LeadStore> LeadService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            month_scope: MonthScope::default(),
        }
    }

    pub fn with_month_scope(mut self, month_scope: MonthScope) -> Self {
        self.month_scope = month_scope;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn add_lead(&self, caller: &Caller, lead: NewLead) -> CoreResult<LeadId> {
        require_identity(caller)?;
        let id = self.store.insert(lead, &caller.identity)?;
        info!(lead_id = id, caller = %caller.identity, "lead added");
        Ok(id)
    }

    /// A single lead if the caller may see it in `view`.
    pub fn get_lead(
        &self,
        caller: &Caller,
        id: LeadId,
        view: View,
    ) -> CoreResult<Option<LeadRecord>> {
        Ok(self
            .store
            .get(id)?
            .filter(|record| access::is_visible(record, caller, view)))
    }

    /// Applies `update` to a lead the caller can see. `Ok(false)` when the
    /// lead is unknown, deleted or not visible to the caller.
    ///
    /// The note is appended to the log as stored at write time, so a
    /// concurrent update or delete is never overwritten.
    pub fn update_lead(
        &self,
        caller: &Caller,
        id: LeadId,
        update: LeadUpdate,
    ) -> CoreResult<bool> {
        require_identity(caller)?;
        if self.get_lead(caller, id, View::Active)?.is_none() {
            debug!(lead_id = id, caller = %caller.identity, "update skipped, lead not visible");
            return Ok(false);
        }
        let now = self.clock.now();
        let updated = self
            .store
            .update_active(id, &|current| Some(update.to_patch(&current.followup_notes, now)))?;
        if updated {
            info!(lead_id = id, caller = %caller.identity, "lead updated");
        }
        Ok(updated)
    }

    /// Moves a visible lead to the trash.
    pub fn delete_lead(&self, caller: &Caller, id: LeadId) -> CoreResult<bool> {
        require_identity(caller)?;
        if self.get_lead(caller, id, View::Active)?.is_none() {
            debug!(lead_id = id, caller = %caller.identity, "delete skipped, lead not visible");
            return Ok(false);
        }
        let deleted = self.store.soft_delete(id, &caller.identity)?;
        if deleted {
            info!(lead_id = id, caller = %caller.identity, "lead deleted");
        }
        Ok(deleted)
    }

    pub fn active_leads(
        &self,
        caller: &Caller,
        scope: CreatorScope,
    ) -> CoreResult<Vec<LeadRecord>> {
        self.filter_leads(caller, scope, &LeadFilter::new())
    }

    /// Visible active leads matching `lead_filter`, most recent first.
    pub fn filter_leads(
        &self,
        caller: &Caller,
        scope: CreatorScope,
        lead_filter: &LeadFilter,
    ) -> CoreResult<Vec<LeadRecord>> {
        let mut lead_filter = lead_filter.clone();
        lead_filter.month = self.scoped_month(lead_filter.month);
        Ok(filter::filter(self.scoped(caller, scope)?, &lead_filter))
    }

    /// Deleted leads visible to the caller, most recently deleted first.
    pub fn trash(&self, caller: &Caller) -> CoreResult<Vec<LeadRecord>> {
        let mut trashed = access::visible(self.store.all()?, caller, View::Trash);
        trashed.sort_by_key(|record| Reverse((record.deleted_at, record.id)));
        Ok(trashed)
    }

    pub fn daily_report(&self, caller: &Caller, scope: CreatorScope) -> CoreResult<LeadReport> {
        let records = self.scoped(caller, scope)?;
        Ok(report::daily_report(&records, self.clock.today()))
    }

    pub fn monthly_report(
        &self,
        caller: &Caller,
        scope: CreatorScope,
        month: MonthFilter,
    ) -> CoreResult<LeadReport> {
        let records = self.scoped(caller, scope)?;
        Ok(report::monthly_report(&records, self.scoped_month(month)))
    }

    pub fn pending_followups(&self, caller: &Caller) -> CoreResult<Vec<LeadRecord>> {
        let records = access::visible(self.store.all()?, caller, View::Active);
        Ok(followup::pending_followups(records, self.clock.today()))
    }

    /// Closes the follow-up on a visible lead. Completing an already
    /// completed follow-up succeeds without touching the record.
    pub fn mark_complete(&self, caller: &Caller, id: LeadId) -> CoreResult<bool> {
        require_identity(caller)?;
        if self.get_lead(caller, id, View::Active)?.is_none() {
            return Ok(false);
        }
        let now = self.clock.now();
        let updated = self.store.update_active(id, &|current| {
            if current.followup_status == FollowupStatus::Completed {
                debug!(lead_id = id, "follow-up already completed");
                return None;
            }
            Some(
                LeadPatch::new()
                    .followup_status(FollowupStatus::Completed)
                    .last_followup(now),
            )
        })?;
        if updated {
            info!(lead_id = id, caller = %caller.identity, "follow-up completed");
        }
        Ok(updated)
    }

    /// Distinct creators of the active leads the caller can see.
    pub fn creators(&self, caller: &Caller) -> CoreResult<Vec<String>> {
        let records = access::visible(self.store.all()?, caller, View::Active);
        Ok(access::creators(&records))
    }

    fn scoped(&self, caller: &Caller, scope: CreatorScope) -> CoreResult<Vec<LeadRecord>> {
        let records = access::visible(self.store.all()?, caller, View::Active);
        Ok(access::restrict_to_creators(records, &scope.for_caller(caller)))
    }

    fn scoped_month(&self, month: MonthFilter) -> MonthFilter {
        match self.month_scope {
            MonthScope::AnyYear => month,
            MonthScope::CurrentYear => month.in_year(self.clock.today().year()),
        }
    }
}

fn require_identity(caller: &Caller) -> CoreResult<()> {
    if caller.identity.trim().is_empty() {
        return Err(LeadlineError::validation("caller", "identity must not be empty"));
    }
    Ok(())
}
