pub mod lead;

pub mod prelude {
    pub use crate::lead::{
        CallStatus, Caller, FollowupEntry, FollowupLog, FollowupStatus, LeadFilter, LeadId,
        LeadPatch, LeadRecord, LeadReport, LeadStatus, LeadTemperature, MonthFilter, NewLead,
        View,
    };
}
