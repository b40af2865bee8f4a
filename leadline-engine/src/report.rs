use chrono::NaiveDate;
use leadline_protocol::lead::{LeadRecord, LeadReport, MonthFilter};
use tracing::warn;

/// Summary of the leads added on `today`.
///
/// `records` must already be scoped to what the caller may see.
pub fn daily_report<'a>(
    records: impl IntoIterator<Item = &'a LeadRecord>,
    today: NaiveDate,
) -> LeadReport {
    let mut report = LeadReport::new();
    for (record, _) in dated(records).filter(|(_, added)| *added == today) {
        report.record(record);
    }
    report
}

/// Summary of the leads added in `month`, with the per-day distribution.
pub fn monthly_report<'a>(
    records: impl IntoIterator<Item = &'a LeadRecord>,
    month: MonthFilter,
) -> LeadReport {
    let mut report = LeadReport::with_daily_distribution();
    for (record, added) in dated(records).filter(|(_, added)| month.matches(*added)) {
        report.record(record);
        report.record_day(added);
    }
    report
}

/// Active records paired with their added-date. Undated records cannot be
/// placed in any period and are dropped with a warning.
fn dated<'a>(
    records: impl IntoIterator<Item = &'a LeadRecord>,
) -> impl Iterator<Item = (&'a LeadRecord, NaiveDate)> {
    records
        .into_iter()
        .filter(|record| record.is_active())
        .filter_map(|record| match record.added_on() {
            Some(added) => Some((record, added)),
            None => {
                warn!(
                    lead_id = record.id,
                    field = "created_at",
                    "lead excluded from report, added date unreadable"
                );
                None
            }
        })
}
