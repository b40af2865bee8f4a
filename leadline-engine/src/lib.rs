//! Lead lifecycle and reporting engine.
//!
//! Everything here works on snapshots taken from a
//! [`LeadStore`](leadline_store::LeadStore): visibility is decided first, then
//! the query filter, report aggregator or follow-up view runs over what the
//! caller may see. [`LeadService`] ties those steps together for callers;
//! the free functions stay pure so they can be reused over any record set.

pub mod access;
pub mod filter;
pub mod followup;
pub mod report;
mod service;

pub use access::{is_visible, restrict_to_creators, visible, CreatorScope};
pub use filter::filter;
pub use followup::pending_followups;
pub use report::{daily_report, monthly_report};
pub use service::{LeadService, LeadUpdate};
