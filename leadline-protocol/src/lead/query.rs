use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::fields::{CallStatus, FieldParseError, LeadStatus};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Calendar-month restriction applied to the date a lead was added.
///
/// A bare month matches that month in any year; `year` pins it to one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonthFilter {
    #[default]
    All,
    Month {
        month: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
    },
}

impl MonthFilter {
    /// Month `1..=12`, any year.
    pub fn month(month: u32) -> Result<Self, FieldParseError> {
        if (1..=12).contains(&month) {
            Ok(MonthFilter::Month { month, year: None })
        } else {
            Err(FieldParseError {
                field: "month",
                value: month.to_string(),
            })
        }
    }

    /// Pins a month restriction to `year`. `All` stays unrestricted.
    pub fn in_year(self, year: i32) -> Self {
        match self {
            MonthFilter::All => MonthFilter::All,
            MonthFilter::Month { month, .. } => MonthFilter::Month {
                month,
                year: Some(year),
            },
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month { month, year } => {
                date.month() == *month && year.map_or(true, |year| date.year() == year)
            }
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("All"),
            MonthFilter::Month { month, year } => {
                let name = MONTH_NAMES[(*month as usize).saturating_sub(1) % 12];
                let mut chars = name.chars();
                let capitalised: String = chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                    .unwrap_or_default();
                match year {
                    Some(year) => write!(f, "{capitalised} {year}"),
                    None => f.write_str(&capitalised),
                }
            }
        }
    }
}

impl FromStr for MonthFilter {
    type Err = FieldParseError;

    /// Accepts `All`, `1`–`12`, full English month names or their first three letters.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_lowercase();
        if value == "all" {
            return Ok(MonthFilter::All);
        }
        if let Ok(number) = value.parse::<u32>() {
            return MonthFilter::month(number);
        }
        MONTH_NAMES
            .iter()
            .position(|name| *name == value || (value.len() == 3 && name.starts_with(&value)))
            .map(|index| MonthFilter::Month {
                month: index as u32 + 1,
                year: None,
            })
            .ok_or_else(|| FieldParseError {
                field: "month",
                value: raw.to_string(),
            })
    }
}

/// Narrowing applied to an already visible set of leads.
///
/// Empty status sets place no restriction on their dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    #[serde(default)]
    pub month: MonthFilter,
    #[serde(default)]
    pub lead_statuses: BTreeSet<LeadStatus>,
    #[serde(default)]
    pub call_statuses: BTreeSet<CallStatus>,
    /// Inclusive range over the date a lead was added.
    #[serde(default)]
    pub created_between: Option<(NaiveDate, NaiveDate)>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: MonthFilter) -> Self {
        self.month = month;
        self
    }

    pub fn lead_statuses(mut self, statuses: impl IntoIterator<Item = LeadStatus>) -> Self {
        self.lead_statuses = statuses.into_iter().collect();
        self
    }

    pub fn call_statuses(mut self, statuses: impl IntoIterator<Item = CallStatus>) -> Self {
        self.call_statuses = statuses.into_iter().collect();
        self
    }

    pub fn created_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.created_between = Some((start, end));
        self
    }

    /// Whether the filter needs a readable added-date to decide.
    pub fn is_date_bound(&self) -> bool {
        !self.month.is_all() || self.created_between.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("All", MonthFilter::All ; "all")]
    #[test_case("3", MonthFilter::Month { month: 3, year: None } ; "number")]
    #[test_case("September", MonthFilter::Month { month: 9, year: None } ; "full name")]
    #[test_case("dec", MonthFilter::Month { month: 12, year: None } ; "abbreviation")]
    fn parses_month_labels(raw: &str, expected: MonthFilter) {
        assert_eq!(raw.parse::<MonthFilter>(), Ok(expected));
    }

    #[test_case("0" ; "zero")]
    #[test_case("13" ; "thirteen")]
    #[test_case("ju" ; "ambiguous prefix")]
    fn rejects_invalid_months(raw: &str) {
        assert!(raw.parse::<MonthFilter>().is_err());
    }

    #[test]
    fn bare_month_matches_every_year() {
        let march = MonthFilter::month(3).unwrap();
        assert!(march.matches(NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()));
        assert!(march.matches(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!march.matches(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));

        let pinned = march.in_year(2024);
        assert!(!pinned.matches(NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()));
        assert!(pinned.matches(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(MonthFilter::All.in_year(2024), MonthFilter::All);
    }

    #[test]
    fn displays_month_names() {
        assert_eq!(MonthFilter::month(1).unwrap().to_string(), "January");
        assert_eq!(MonthFilter::month(5).unwrap().in_year(2024).to_string(), "May 2024");
        assert_eq!(MonthFilter::All.to_string(), "All");
    }
}
