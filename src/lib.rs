//! Leadline: sales lead tracking and reporting.
//!
//! Leads are recorded by users, updated as calls and follow-ups happen, and
//! soft-deleted into a trash view. Reports summarise what was added per day
//! and per month.
//!
//! # Architecture
//!
//! The workspace is split into several crates, re-exported here:
//!
//! * `leadline_core`: errors, configuration, logging and the clock
//! * `leadline_protocol`: the lead data model
//! * `leadline_store`: the durable record store (SQLite or in-memory)
//! * `leadline_engine`: visibility, filtering, reports, follow-ups and [`LeadService`]

pub use leadline_core;
pub use leadline_engine;
pub use leadline_protocol;
pub use leadline_store;

pub use leadline_core::{Clock, CoreConfig, CoreResult, LeadlineError, SystemClock};
pub use leadline_engine::{CreatorScope, LeadService, LeadUpdate};
pub use leadline_protocol::prelude::*;
pub use leadline_store::{LeadStore, MemoryLeadStore, SqliteLeadStore, StoreError};

use std::sync::Arc;

/// Opens the configured SQLite database and wraps it in a service using the
/// system clock.
pub fn open_service(config: &CoreConfig) -> CoreResult<LeadService<SqliteLeadStore>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = SqliteLeadStore::open(&config.database_path, clock.clone())?;
    Ok(LeadService::new(store, clock).with_month_scope(config.month_scope))
}
