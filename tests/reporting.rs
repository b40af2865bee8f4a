// Report and filter behaviour over a realistic mixed data set.
mod common;

use common::{day, memory_service, sqlite_service};
use leadline::{
    CallStatus, Caller, CreatorScope, LeadFilter, LeadService, LeadStatus, LeadTemperature,
    LeadUpdate, MemoryLeadStore, MonthFilter, NewLead,
};
use leadline_core::{FixedClock, MonthScope};
use tempfile::TempDir;
use test_case::test_case;

/// Leads spread over March 2023, March 2024 and April 2024 by two members.
fn seeded() -> (LeadService<MemoryLeadStore>, FixedClock) {
    let (service, clock) = memory_service(day(2023, 3, 14));
    let alice = Caller::member("alice");
    let bob = Caller::member("bob");

    service
        .add_lead(&alice, NewLead::new("Old March", "1").status(LeadStatus::Working))
        .unwrap();

    clock.set(day(2024, 3, 2).and_hms_opt(10, 0, 0).unwrap());
    service
        .add_lead(
            &alice,
            NewLead::new("Hot one", "2")
                .temperature(LeadTemperature::Hot)
                .details_shared(true),
        )
        .unwrap();
    service
        .add_lead(&bob, NewLead::new("Busy one", "3").call_status(CallStatus::Busy))
        .unwrap();

    clock.set(day(2024, 3, 20).and_hms_opt(16, 30, 0).unwrap());
    let gone = service
        .add_lead(&bob, NewLead::new("Deleted", "4").status(LeadStatus::Fresher))
        .unwrap();
    service.delete_lead(&bob, gone).unwrap();

    clock.set(day(2024, 4, 1).and_hms_opt(9, 0, 0).unwrap());
    service
        .add_lead(&alice, NewLead::new("April", "5").status(LeadStatus::Unemployed))
        .unwrap();
    (service, clock)
}

#[test_case(MonthFilter::All, 4 ; "all months")]
#[test_case(MonthFilter::month(3).unwrap(), 3 ; "march across years")]
#[test_case(MonthFilter::month(4).unwrap(), 1 ; "april")]
#[test_case(MonthFilter::month(12).unwrap(), 0 ; "empty month")]
fn monthly_totals_are_conserved(month: MonthFilter, expected: u64) {
    let (service, _) = seeded();
    let report = service
        .monthly_report(&Caller::admin("root"), CreatorScope::All, month)
        .unwrap();
    assert_eq!(report.total_leads, expected);
    assert_eq!(report.status_total(), report.total_leads);
    let call_total: u64 = report.call_status_breakdown.values().sum();
    assert_eq!(call_total, report.total_leads);
    assert_eq!(report.hot_leads + report.cold_leads, report.total_leads);
    let per_day: u64 = report.daily_leads.as_ref().unwrap().values().sum();
    assert_eq!(per_day, report.total_leads);
}

#[test]
fn march_distribution_is_sparse_and_chronological() {
    let (service, _) = seeded();
    let report = service
        .monthly_report(&Caller::admin("root"), CreatorScope::All, MonthFilter::month(3).unwrap())
        .unwrap();
    let days: Vec<_> = report.daily_leads.unwrap().into_iter().collect();
    assert_eq!(days, vec![(day(2023, 3, 14), 1), (day(2024, 3, 2), 2)]);
    assert_eq!(report.hot_leads, 1);
    assert_eq!(report.details_shared, 1);
    assert_eq!(report.calls_taken, 2);
}

#[test]
fn current_year_scope_drops_last_years_march() {
    let (service, _) = seeded();
    let service = service.with_month_scope(MonthScope::CurrentYear);
    let report = service
        .monthly_report(&Caller::admin("root"), CreatorScope::All, MonthFilter::month(3).unwrap())
        .unwrap();
    assert_eq!(report.total_leads, 2);
}

#[test]
fn members_only_report_their_own_leads() {
    let (service, _) = seeded();
    let bob = Caller::member("bob");
    let report = service
        .monthly_report(&bob, CreatorScope::only(["alice"]), MonthFilter::All)
        .unwrap();
    assert_eq!(report.total_leads, 1);
    assert_eq!(report.call_status_breakdown[&CallStatus::Busy], 1);
}

#[test]
fn admins_can_scope_to_creators() {
    let (service, _) = seeded();
    let admin = Caller::admin("root");
    let alice_only = service
        .monthly_report(&admin, CreatorScope::only(["alice"]), MonthFilter::All)
        .unwrap();
    assert_eq!(alice_only.total_leads, 3);
    assert_eq!(service.creators(&admin).unwrap(), vec!["alice", "bob"]);
}

#[test]
fn a_corrupt_stored_lead_does_not_stop_reports() {
    let dir = TempDir::new().unwrap();
    let (service, _) = sqlite_service(&dir, day(2024, 3, 1));
    service
        .add_lead(&Caller::member("alice"), NewLead::new("Asha", "1"))
        .unwrap();

    let raw = rusqlite::Connection::open(dir.path().join("leads.db")).unwrap();
    raw.execute(
        "INSERT INTO leads (name, phone, created_by, created_at, deleted, deleted_by, deleted_at)
         VALUES ('Ravi', '2', 'bob', '2024-03-01 09:00:00', 1, 'bob', '03/01/2024')",
        [],
    )
    .unwrap();

    let admin = Caller::admin("root");
    let report = service.daily_report(&admin, CreatorScope::All).unwrap();
    assert_eq!(report.total_leads, 1);
    assert_eq!(service.active_leads(&admin, CreatorScope::All).unwrap().len(), 1);
    assert!(service.trash(&admin).unwrap().is_empty());
    assert!(service.pending_followups(&admin).unwrap().is_empty());
}

#[test]
fn daily_report_for_an_empty_day_is_zero() {
    let (service, clock) = seeded();
    clock.set(day(2024, 5, 1).and_hms_opt(9, 0, 0).unwrap());
    let report = service
        .daily_report(&Caller::admin("root"), CreatorScope::All)
        .unwrap();
    assert!(report.is_empty());
    assert!(report.status_breakdown.is_empty());
    assert!(report.call_status_breakdown.is_empty());
    assert_eq!(report.daily_leads, None);
}

#[test]
fn filters_combine_and_are_idempotent() {
    let (service, _) = seeded();
    let admin = Caller::admin("root");
    let filter = LeadFilter::new()
        .month(MonthFilter::month(3).unwrap())
        .lead_statuses([LeadStatus::Student, LeadStatus::Working])
        .call_statuses([CallStatus::CallTaken]);

    let first = service
        .filter_leads(&admin, CreatorScope::All, &filter)
        .unwrap();
    let names: Vec<_> = first.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Hot one", "Old March"]);

    let again = leadline_engine::filter(first.clone(), &filter);
    assert_eq!(again, first);
}

#[test]
fn created_between_selects_an_inclusive_range() {
    let (service, _) = seeded();
    let admin = Caller::admin("root");
    let filter = LeadFilter::new().created_between(day(2024, 3, 2), day(2024, 4, 1));
    let leads = service
        .filter_leads(&admin, CreatorScope::All, &filter)
        .unwrap();
    assert_eq!(leads.len(), 3);
}

#[test]
fn updates_move_leads_between_breakdowns() {
    let (service, _) = seeded();
    let admin = Caller::admin("root");
    service
        .update_lead(&admin, 3, LeadUpdate::new().call_status(CallStatus::CallTaken))
        .unwrap();
    let report = service
        .monthly_report(&admin, CreatorScope::All, MonthFilter::All)
        .unwrap();
    assert_eq!(report.calls_taken, 4);
    assert!(!report.call_status_breakdown.contains_key(&CallStatus::Busy));
}

#[test]
fn reports_serialize_with_stored_labels() {
    let (service, _) = seeded();
    let report = service
        .monthly_report(&Caller::admin("root"), CreatorScope::All, MonthFilter::month(4).unwrap())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status_breakdown"]["Unemployed"], 1);
    assert_eq!(json["daily_leads"]["2024-04-01"], 1);
}
