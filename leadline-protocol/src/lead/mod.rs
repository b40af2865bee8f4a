mod caller;
mod fields;
pub mod format;
mod notes;
mod query;
mod record;
mod report;

pub use caller::{Caller, View};
pub use fields::{CallStatus, FieldParseError, FollowupStatus, LeadStatus, LeadTemperature};
pub use notes::{FollowupEntry, FollowupLog};
pub use query::{LeadFilter, MonthFilter};
pub use record::{LeadId, LeadPatch, LeadRecord, NewLead};
pub use report::LeadReport;
