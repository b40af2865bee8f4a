use serde::Serialize;

use crate::errors::{LeadlineError, Result};

/// Indented JSON, as printed by `--json` and written by exports.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| LeadlineError::SerializationError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn output_is_indented() {
        let json = to_pretty_json(&serde_json::json!({"lead": "Asha", "id": 1})).unwrap();
        assert!(json.starts_with("{\n  "));
        assert!(json.contains("\"lead\": \"Asha\""));
    }

    #[test]
    fn unrepresentable_values_are_serialization_errors() {
        let mut by_pair = BTreeMap::new();
        by_pair.insert((1u8, 2u8), "x");
        let err = to_pretty_json(&by_pair).unwrap_err();
        assert!(matches!(err, LeadlineError::SerializationError(_)));
    }
}
