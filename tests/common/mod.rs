#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use leadline::{Clock, LeadService, MemoryLeadStore, SqliteLeadStore};
use leadline_core::FixedClock;
use tempfile::TempDir;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn memory_service(today: NaiveDate) -> (LeadService<MemoryLeadStore>, FixedClock) {
    let clock = FixedClock::at_date(today);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let service = LeadService::new(MemoryLeadStore::new(shared.clone()), shared);
    (service, clock)
}

pub fn sqlite_service(
    dir: &TempDir,
    today: NaiveDate,
) -> (LeadService<SqliteLeadStore>, FixedClock) {
    let clock = FixedClock::at_date(today);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let store = SqliteLeadStore::open(dir.path().join("leads.db"), shared.clone())
        .expect("open store");
    (LeadService::new(store, shared), clock)
}
