use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{CallStatus, LeadStatus, LeadTemperature};
use super::record::LeadRecord;

/// Performance summary over a scoped set of leads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReport {
    pub total_leads: u64,
    pub calls_taken: u64,
    pub hot_leads: u64,
    pub cold_leads: u64,
    pub details_shared: u64,
    pub status_breakdown: BTreeMap<LeadStatus, u64>,
    pub call_status_breakdown: BTreeMap<CallStatus, u64>,
    /// Leads added per day, only for days with at least one lead. Present on
    /// monthly reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_leads: Option<BTreeMap<NaiveDate, u64>>,
}

impl LeadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty report that also tracks the per-day distribution.
    pub fn with_daily_distribution() -> Self {
        Self {
            daily_leads: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// Counts one lead into every total and breakdown.
    pub fn record(&mut self, lead: &LeadRecord) {
        self.total_leads += 1;
        if lead.call_status == CallStatus::CallTaken {
            self.calls_taken += 1;
        }
        match lead.lead_temperature {
            LeadTemperature::Hot => self.hot_leads += 1,
            LeadTemperature::Cold => self.cold_leads += 1,
        }
        if lead.details_shared {
            self.details_shared += 1;
        }
        *self.status_breakdown.entry(lead.lead_status).or_insert(0) += 1;
        *self.call_status_breakdown.entry(lead.call_status).or_insert(0) += 1;
    }

    /// Counts one lead into the per-day distribution, if it is tracked.
    pub fn record_day(&mut self, day: NaiveDate) {
        if let Some(daily) = self.daily_leads.as_mut() {
            *daily.entry(day).or_insert(0) += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_leads == 0
    }

    /// Sum of the lead-status breakdown; always equal to `total_leads`.
    pub fn status_total(&self) -> u64 {
        self.status_breakdown.values().sum()
    }
}
