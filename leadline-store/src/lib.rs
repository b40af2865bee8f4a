//! Record store for lead records.
//!
//! A [`LeadStore`] owns lead identity and the soft-delete tombstone. Two
//! backends are provided: [`SqliteLeadStore`] persists to a single `leads`
//! table, and [`MemoryLeadStore`] keeps everything in process for tests and
//! ephemeral use. Both serialize every mutation behind one lock.

mod error;
mod memory;
mod row;
mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryLeadStore;
pub use sqlite::SqliteLeadStore;
pub use store::LeadStore;
