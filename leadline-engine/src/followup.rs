use chrono::NaiveDate;
use leadline_protocol::lead::LeadRecord;

/// Active records with an open follow-up scheduled on or before `today`,
/// soonest first.
pub fn pending_followups(
    records: impl IntoIterator<Item = LeadRecord>,
    today: NaiveDate,
) -> Vec<LeadRecord> {
    let mut due: Vec<LeadRecord> = records
        .into_iter()
        .filter(|record| record.is_active() && record.followup_due(today))
        .collect();
    due.sort_by_key(|record| (record.next_followup, record.id));
    due
}
