//! Core shared library for the Leadline lead tracker.
//!
//! This crate exposes the primitives every other crate depends on: the
//! canonical error type, configuration loading, the clock abstraction used to
//! stamp and scope records, JSON output and logging setup.

pub mod clock;
pub mod config;
pub mod errors;
pub mod json;
pub mod logging;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CoreConfig, MonthScope};
pub use errors::{LeadlineError, Result as CoreResult};
