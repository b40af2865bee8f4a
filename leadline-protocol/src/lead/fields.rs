use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored or user-supplied label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value: {value:?}")]
pub struct FieldParseError {
    pub field: &'static str,
    pub value: String,
}

/// Labels are compared case-insensitively and `-`/`_` count as spaces, so
/// `call-taken` and `Call taken` name the same call status.
fn normalise(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

macro_rules! labelled_enum {
    (
        $name:ident,
        $field:literal,
        $default:ident,
        { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label used in storage and presentation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FieldParseError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = normalise(raw);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| normalise(candidate.as_str()) == wanted)
                    .ok_or_else(|| FieldParseError {
                        field: $field,
                        value: raw.to_string(),
                    })
            }
        }
    };
}

/// How warm a lead is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadTemperature {
    Hot,
    Cold,
}

labelled_enum!(LeadTemperature, "lead_temperature", Cold, {
    Hot => "Hot",
    Cold => "Cold",
});

/// Occupation of the lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStatus {
    Student,
    Working,
    Unemployed,
    Fresher,
}

labelled_enum!(LeadStatus, "lead_status", Student, {
    Student => "Student",
    Working => "Working",
    Unemployed => "Unemployed",
    Fresher => "Fresher",
});

/// Outcome of the most recent call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallStatus {
    #[serde(rename = "Call taken")]
    CallTaken,
    Busy,
    #[serde(rename = "RNP")]
    Rnp,
    #[serde(rename = "Out of service")]
    OutOfService,
    Abroad,
    #[serde(rename = "Cut the call")]
    CutTheCall,
}

labelled_enum!(CallStatus, "call_status", CallTaken, {
    CallTaken => "Call taken",
    Busy => "Busy",
    Rnp => "RNP",
    OutOfService => "Out of service",
    Abroad => "Abroad",
    CutTheCall => "Cut the call",
});

/// State of the scheduled follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FollowupStatus {
    Pending,
    Completed,
    Rescheduled,
    #[serde(rename = "No Response")]
    NoResponse,
}

labelled_enum!(FollowupStatus, "followup_status", Pending, {
    Pending => "Pending",
    Completed => "Completed",
    Rescheduled => "Rescheduled",
    NoResponse => "No Response",
});

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Call taken", CallStatus::CallTaken ; "exact label")]
    #[test_case("call-taken", CallStatus::CallTaken ; "dashed")]
    #[test_case("OUT_OF_SERVICE", CallStatus::OutOfService ; "shouted snake case")]
    #[test_case(" rnp ", CallStatus::Rnp ; "padded acronym")]
    fn parses_call_status_labels(raw: &str, expected: CallStatus) {
        assert_eq!(raw.parse::<CallStatus>(), Ok(expected));
    }

    #[test]
    fn unknown_label_names_the_field() {
        let err = "Retired".parse::<LeadStatus>().unwrap_err();
        assert_eq!(err.field, "lead_status");
        assert_eq!(err.to_string(), "unknown lead_status value: \"Retired\"");
    }

    #[test]
    fn declared_defaults() {
        assert_eq!(LeadStatus::default(), LeadStatus::Student);
        assert_eq!(CallStatus::default(), CallStatus::CallTaken);
        assert_eq!(LeadTemperature::default(), LeadTemperature::Cold);
        assert_eq!(FollowupStatus::default(), FollowupStatus::Pending);
    }

    #[test]
    fn serde_uses_display_labels() {
        for status in CallStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        let json = serde_json::to_string(&FollowupStatus::NoResponse).unwrap();
        assert_eq!(json, "\"No Response\"");
    }
}
