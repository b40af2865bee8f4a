use std::cmp::Reverse;

use leadline_protocol::lead::{LeadFilter, LeadRecord};
use tracing::warn;

/// Whether `record` satisfies every predicate of `filter`.
///
/// Date predicates need a readable added-date; records without one never
/// match a date-bound filter.
pub fn matches(record: &LeadRecord, filter: &LeadFilter) -> bool {
    if !filter.lead_statuses.is_empty() && !filter.lead_statuses.contains(&record.lead_status) {
        return false;
    }
    if !filter.call_statuses.is_empty() && !filter.call_statuses.contains(&record.call_status) {
        return false;
    }
    if !filter.is_date_bound() {
        return true;
    }

    let Some(added) = record.added_on() else {
        warn!(
            lead_id = record.id,
            field = "created_at",
            "lead has no readable date, excluded from date filter"
        );
        return false;
    };
    let in_range = filter
        .created_between
        .map_or(true, |(start, end)| start <= added && added <= end);
    in_range && filter.month.matches(added)
}

/// Narrows an already visible set, most recently added first.
pub fn filter(
    records: impl IntoIterator<Item = LeadRecord>,
    filter: &LeadFilter,
) -> Vec<LeadRecord> {
    let mut selected: Vec<LeadRecord> = records
        .into_iter()
        .filter(|record| matches(record, filter))
        .collect();
    newest_first(&mut selected);
    selected
}

/// Sorts by added time descending, ties by identity descending. Undated
/// records go last.
pub fn newest_first(records: &mut [LeadRecord]) {
    records.sort_by_key(|record| Reverse((record.created_at, record.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, lead};
    use chrono::NaiveDate;
    use leadline_protocol::lead::{CallStatus, LeadStatus, MonthFilter};

    fn fixture() -> Vec<LeadRecord> {
        let mut working = lead(2, "alice", "2024-03-05 10:00:00");
        working.lead_status = LeadStatus::Working;
        working.call_status = CallStatus::Busy;
        let mut undated = lead(4, "alice", "2024-03-06 10:00:00");
        undated.created_at = None;
        vec![
            lead(1, "alice", "2023-03-20 09:00:00"),
            working,
            lead(3, "alice", "2024-04-01 08:00:00"),
            undated,
        ]
    }

    fn ids(records: &[LeadRecord]) -> Vec<u64> {
        records.iter().map(|record| record.id).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_newest_first() {
        assert_eq!(ids(&filter(fixture(), &LeadFilter::new())), vec![3, 2, 1, 4]);
    }

    #[test]
    fn month_matches_across_years_and_skips_undated() {
        let march = LeadFilter::new().month(MonthFilter::month(3).unwrap());
        assert_eq!(ids(&filter(fixture(), &march)), vec![2, 1]);

        let pinned = LeadFilter::new().month(MonthFilter::month(3).unwrap().in_year(2024));
        assert_eq!(ids(&filter(fixture(), &pinned)), vec![2]);
    }

    #[test]
    fn status_sets_combine_with_and() {
        let both = LeadFilter::new()
            .lead_statuses([LeadStatus::Working, LeadStatus::Fresher])
            .call_statuses([CallStatus::Busy]);
        assert_eq!(ids(&filter(fixture(), &both)), vec![2]);

        let none = LeadFilter::new()
            .lead_statuses([LeadStatus::Student])
            .call_statuses([CallStatus::Busy]);
        assert!(filter(fixture(), &none).is_empty());
    }

    #[test]
    fn created_between_is_inclusive() {
        let range = LeadFilter::new().created_between(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        );
        assert_eq!(ids(&filter(fixture(), &range)), vec![3, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let narrowing = LeadFilter::new()
            .month(MonthFilter::month(3).unwrap())
            .lead_statuses([LeadStatus::Student, LeadStatus::Working]);
        let once = filter(fixture(), &narrowing);
        let twice = filter(once.clone(), &narrowing);
        assert_eq!(once, twice);
    }

    #[test]
    fn ties_break_on_identity() {
        let mut records = vec![
            lead(7, "alice", "2024-01-01 09:00:00"),
            lead(9, "alice", "2024-01-01 09:00:00"),
        ];
        newest_first(&mut records);
        assert_eq!(ids(&records), vec![9, 7]);
        assert_eq!(records[0].created_at, Some(at("2024-01-01 09:00:00")));
    }
}
