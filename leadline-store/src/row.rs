use std::str::FromStr;

use leadline_protocol::lead::format::{format_date, format_timestamp, parse_date, parse_timestamp};
use leadline_protocol::lead::{FieldParseError, FollowupLog, LeadId, LeadRecord};
use tracing::warn;

use crate::error::StoreError;

/// Column list shared by every `SELECT` so that [`LeadRow::from_row`] can
/// address columns by position.
pub(crate) const LEAD_COLUMNS: &str = "id, name, phone, email, lead_temperature, lead_status, \
     call_status, details_shared, notes, followup_notes, last_followup, next_followup, \
     followup_status, created_by, created_at, deleted, deleted_by, deleted_at";

/// Raw `leads` row as persisted. Every optional column is kept optional here;
/// [`LeadRow::resolve`] is the one place defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LeadRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub lead_temperature: Option<String>,
    pub lead_status: Option<String>,
    pub call_status: Option<String>,
    pub details_shared: Option<i64>,
    pub notes: Option<String>,
    pub followup_notes: Option<String>,
    pub last_followup: Option<String>,
    pub next_followup: Option<String>,
    pub followup_status: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub deleted: Option<i64>,
    pub deleted_by: Option<String>,
    pub deleted_at: Option<String>,
}

impl LeadRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(LeadRow {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            phone: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            email: row.get(3)?,
            lead_temperature: row.get(4)?,
            lead_status: row.get(5)?,
            call_status: row.get(6)?,
            details_shared: row.get(7)?,
            notes: row.get(8)?,
            followup_notes: row.get(9)?,
            last_followup: row.get(10)?,
            next_followup: row.get(11)?,
            followup_status: row.get(12)?,
            created_by: row.get(13)?,
            created_at: row.get(14)?,
            deleted: row.get(15)?,
            deleted_by: row.get(16)?,
            deleted_at: row.get(17)?,
        })
    }

    /// Stored form of a record.
    pub fn from_record(record: &LeadRecord) -> Self {
        LeadRow {
            id: record.id as i64,
            name: record.name.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            lead_temperature: Some(record.lead_temperature.as_str().to_string()),
            lead_status: Some(record.lead_status.as_str().to_string()),
            call_status: Some(record.call_status.as_str().to_string()),
            details_shared: Some(record.details_shared as i64),
            notes: record.notes.clone(),
            followup_notes: Some(record.followup_notes.to_storage()),
            last_followup: record.last_followup.as_ref().map(format_timestamp),
            next_followup: record.next_followup.as_ref().map(format_date),
            followup_status: Some(record.followup_status.as_str().to_string()),
            created_by: Some(record.created_by.clone()),
            created_at: record.created_at.as_ref().map(format_timestamp),
            deleted: Some(record.deleted as i64),
            deleted_by: record.deleted_by.clone(),
            deleted_at: record.deleted_at.as_ref().map(format_timestamp),
        }
    }

    /// Turns the raw row into a record, resolving missing or unreadable
    /// optional values to their declared defaults.
    ///
    /// Unreadable dates become `None` (and are logged) so one bad value never
    /// hides the rest of the lead. A tombstone that contradicts the `deleted`
    /// flag is reported as corruption.
    pub fn resolve(self) -> Result<LeadRecord, StoreError> {
        let id = LeadId::try_from(self.id)
            .map_err(|_| StoreError::corrupt(0, "id", format!("negative identity {}", self.id)))?;

        let deleted = self.deleted.unwrap_or(0) != 0;
        let deleted_by = non_blank(self.deleted_by);
        let deleted_at = match non_blank(self.deleted_at) {
            Some(raw) => Some(
                parse_timestamp(&raw)
                    .ok_or_else(|| StoreError::corrupt(id, "deleted_at", format!("{raw:?}")))?,
            ),
            None => None,
        };
        if deleted && deleted_by.is_none() {
            return Err(StoreError::corrupt(id, "deleted_by", "missing on a deleted lead"));
        }
        if deleted && deleted_at.is_none() {
            return Err(StoreError::corrupt(id, "deleted_at", "missing on a deleted lead"));
        }
        if !deleted && (deleted_by.is_some() || deleted_at.is_some()) {
            return Err(StoreError::corrupt(id, "deleted", "tombstone set on an active lead"));
        }

        Ok(LeadRecord {
            id,
            name: self.name,
            phone: self.phone,
            email: non_blank(self.email),
            lead_temperature: label_or_default(id, self.lead_temperature),
            lead_status: label_or_default(id, self.lead_status),
            call_status: label_or_default(id, self.call_status),
            details_shared: self.details_shared.unwrap_or(0) != 0,
            notes: non_blank(self.notes),
            followup_notes: self
                .followup_notes
                .as_deref()
                .map(FollowupLog::parse)
                .unwrap_or_default(),
            last_followup: timestamp_or_none(id, "last_followup", self.last_followup),
            next_followup: date_or_none(id, "next_followup", self.next_followup),
            followup_status: label_or_default(id, self.followup_status),
            created_by: self.created_by.unwrap_or_default(),
            created_at: timestamp_or_none(id, "created_at", self.created_at),
            deleted,
            deleted_by,
            deleted_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn label_or_default<T>(id: LeadId, raw: Option<String>) -> T
where
    T: FromStr<Err = FieldParseError> + Default,
{
    match non_blank(raw) {
        None => T::default(),
        Some(raw) => raw.parse().unwrap_or_else(|err: FieldParseError| {
            warn!(lead_id = id, field = err.field, value = %raw, "unknown label, using default");
            T::default()
        }),
    }
}

fn timestamp_or_none(
    id: LeadId,
    field: &'static str,
    raw: Option<String>,
) -> Option<chrono::NaiveDateTime> {
    let raw = non_blank(raw)?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        warn!(lead_id = id, field, value = %raw, "unreadable timestamp ignored");
    }
    parsed
}

fn date_or_none(id: LeadId, field: &'static str, raw: Option<String>) -> Option<chrono::NaiveDate> {
    let raw = non_blank(raw)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        warn!(lead_id = id, field, value = %raw, "unreadable date ignored");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leadline_protocol::lead::{CallStatus, FollowupStatus, LeadStatus, LeadTemperature};

    fn bare_row() -> LeadRow {
        LeadRow {
            id: 4,
            name: "Asha".into(),
            phone: "555-0100".into(),
            created_by: Some("alice".into()),
            created_at: Some("2024-01-01 09:00:00".into()),
            ..LeadRow::default()
        }
    }

    #[test]
    fn missing_columns_resolve_to_declared_defaults() {
        let record = bare_row().resolve().expect("resolve");
        assert_eq!(record.lead_status, LeadStatus::Student);
        assert_eq!(record.call_status, CallStatus::CallTaken);
        assert_eq!(record.lead_temperature, LeadTemperature::Cold);
        assert_eq!(record.followup_status, FollowupStatus::Pending);
        assert!(record.followup_notes.is_empty());
        assert!(!record.deleted);
    }

    #[test]
    fn unreadable_values_degrade_instead_of_failing() {
        let row = LeadRow {
            call_status: Some("Voicemail".into()),
            created_at: Some("yesterday-ish".into()),
            next_followup: Some("soon".into()),
            ..bare_row()
        };
        let record = row.resolve().expect("resolve");
        assert_eq!(record.call_status, CallStatus::CallTaken);
        assert_eq!(record.created_at, None);
        assert_eq!(record.next_followup, None);
    }

    #[test]
    fn inconsistent_tombstones_are_corruption() {
        let row = LeadRow {
            deleted: Some(1),
            deleted_by: Some("alice".into()),
            ..bare_row()
        };
        assert!(matches!(
            row.resolve(),
            Err(StoreError::Corrupt { id: 4, field: "deleted_at", .. })
        ));

        let row = LeadRow {
            deleted_by: Some("alice".into()),
            ..bare_row()
        };
        assert!(matches!(
            row.resolve(),
            Err(StoreError::Corrupt { field: "deleted", .. })
        ));
    }

    #[test]
    fn record_round_trips_through_its_row() {
        let mut record = bare_row().resolve().unwrap();
        record.next_followup = NaiveDate::from_ymd_opt(2024, 2, 1);
        record.mark_deleted(
            "bob",
            NaiveDate::from_ymd_opt(2024, 2, 2)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        let row = LeadRow::from_record(&record);
        assert_eq!(row.next_followup.as_deref(), Some("2024-02-01"));
        assert_eq!(row.deleted_at.as_deref(), Some("2024-02-02 08:00:00"));
        assert_eq!(row.resolve().unwrap(), record);
    }
}
