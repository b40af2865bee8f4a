use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::fields::{CallStatus, FollowupStatus, LeadStatus, LeadTemperature};
use super::format::{opt_date, opt_timestamp};
use super::notes::FollowupLog;

/// Store-assigned identity of a lead. Never reused, even after deletion.
pub type LeadId = u64;

/// A lead as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub lead_temperature: LeadTemperature,
    #[serde(default)]
    pub lead_status: LeadStatus,
    #[serde(default)]
    pub call_status: CallStatus,
    #[serde(default)]
    pub details_shared: bool,
    /// Initial remarks captured when the lead was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub followup_notes: FollowupLog,
    #[serde(default, with = "opt_timestamp")]
    pub last_followup: Option<NaiveDateTime>,
    #[serde(default, with = "opt_date")]
    pub next_followup: Option<NaiveDate>,
    #[serde(default)]
    pub followup_status: FollowupStatus,
    pub created_by: String,
    /// `None` only when a stored value could not be read back as a timestamp.
    #[serde(default, with = "opt_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    #[serde(default, with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

impl LeadRecord {
    /// Builds the stored form of a freshly inserted lead.
    pub fn from_new(
        id: LeadId,
        lead: NewLead,
        created_by: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name: lead.name.trim().to_string(),
            phone: lead.phone.trim().to_string(),
            email: lead.email,
            lead_temperature: lead.lead_temperature,
            lead_status: lead.lead_status,
            call_status: lead.call_status,
            details_shared: lead.details_shared,
            notes: lead.notes,
            followup_notes: FollowupLog::new(),
            last_followup: None,
            next_followup: None,
            followup_status: FollowupStatus::default(),
            created_by: created_by.into(),
            created_at: Some(created_at),
            deleted: false,
            deleted_by: None,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Date the lead was added, if known.
    pub fn added_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|value| value.date())
    }

    /// Sets the tombstone. Returns `false` when the lead was already deleted.
    pub fn mark_deleted(&mut self, deleted_by: impl Into<String>, at: NaiveDateTime) -> bool {
        if self.deleted {
            return false;
        }
        self.deleted = true;
        self.deleted_by = Some(deleted_by.into());
        self.deleted_at = Some(at);
        true
    }

    /// `deleted_by`/`deleted_at` are present exactly when `deleted` is set.
    pub fn tombstone_is_consistent(&self) -> bool {
        self.deleted == self.deleted_by.is_some() && self.deleted == self.deleted_at.is_some()
    }

    /// Whether a follow-up is scheduled on or before `today` and still open.
    pub fn followup_due(&self, today: NaiveDate) -> bool {
        matches!(self.next_followup, Some(date) if date <= today)
            && self.followup_status != FollowupStatus::Completed
    }
}

/// Fields supplied by the caller when recording a new lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub lead_temperature: LeadTemperature,
    #[serde(default)]
    pub lead_status: LeadStatus,
    #[serde(default)]
    pub call_status: CallStatus,
    #[serde(default)]
    pub details_shared: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewLead {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
            lead_temperature: LeadTemperature::default(),
            lead_status: LeadStatus::default(),
            call_status: CallStatus::default(),
            details_shared: false,
            notes: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email.into());
        self
    }

    pub fn temperature(mut self, temperature: LeadTemperature) -> Self {
        self.lead_temperature = temperature;
        self
    }

    pub fn status(mut self, status: LeadStatus) -> Self {
        self.lead_status = status;
        self
    }

    pub fn call_status(mut self, status: CallStatus) -> Self {
        self.call_status = status;
        self
    }

    pub fn details_shared(mut self, shared: bool) -> Self {
        self.details_shared = shared;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(notes.into());
        self
    }

    /// Name of the first required field that is empty, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.phone.trim().is_empty() {
            Some("phone")
        } else {
            None
        }
    }
}

/// Partial update merged into an existing lead.
///
/// Identity and provenance fields are deliberately absent: they cannot be
/// changed after insert. `followup_notes`, when present, replaces the whole
/// stored log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub lead_status: Option<LeadStatus>,
    pub call_status: Option<CallStatus>,
    pub lead_temperature: Option<LeadTemperature>,
    pub followup_status: Option<FollowupStatus>,
    pub last_followup: Option<NaiveDateTime>,
    /// `Some(None)` clears the scheduled date.
    pub next_followup: Option<Option<NaiveDate>>,
    pub followup_notes: Option<FollowupLog>,
}

impl LeadPatch {
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

    pub fn last_followup(mut self, at: NaiveDateTime) -> Self {
        self.last_followup = Some(at);
        self
    }

    pub fn next_followup(mut self, date: Option<NaiveDate>) -> Self {
        self.next_followup = Some(date);
        self
    }

    pub fn followup_notes(mut self, log: FollowupLog) -> Self {
        self.followup_notes = Some(log);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &LeadPatch::default()
    }

    /// Merges the supplied fields into `record`.
    pub fn apply_to(&self, record: &mut LeadRecord) {
        if let Some(status) = self.lead_status {
            record.lead_status = status;
        }
        if let Some(status) = self.call_status {
            record.call_status = status;
        }
        if let Some(temperature) = self.lead_temperature {
            record.lead_temperature = temperature;
        }
        if let Some(status) = self.followup_status {
            record.followup_status = status;
        }
        if let Some(at) = self.last_followup {
            record.last_followup = Some(at);
        }
        if let Some(next) = self.next_followup {
            record.next_followup = next;
        }
        if let Some(log) = &self.followup_notes {
            record.followup_notes = log.clone();
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
