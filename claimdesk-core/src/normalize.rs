//! Payload normalization for claim updates.
//!
//! The same rules run on both sides of the wire: authoritatively in the
//! service before anything touches storage, defensively in the client before
//! a payload leaves the browser-facing layer. The rules are:
//!
//! - keys outside the canonical field registry (legacy and derived names
//!   included) are stripped silently;
//! - numeric fields coerce numeric-looking strings; an empty string means
//!   "set to NULL", never "set to zero";
//! - date fields canonicalize to `YYYY-MM-DD`; already-canonical values pass
//!   through unchanged; unparseable values are kept verbatim with a warning,
//!   never dropped;
//! - text fields treat the empty string as NULL.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::error::ValidationError;
use crate::fields::{ClaimField, FieldKind};
use crate::patch::ClaimPatch;
use crate::value::FieldValue;

/// Canonical date format.
const CANONICAL_DATE: &str = "%Y-%m-%d";

/// Accepted locale date formats, tried in order.
const LOCALE_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];

/// Normalize a date string to canonical `YYYY-MM-DD` form.
///
/// Returns `None` when the input matches no accepted format. Whitespace is
/// trimmed before parsing.
pub fn normalize_date(input: &str) -> Option<String> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, CANONICAL_DATE) {
        return Some(date.format(CANONICAL_DATE).to_string());
    }

    for fmt in LOCALE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date.format(CANONICAL_DATE).to_string());
        }
    }

    None
}

/// Normalize a single raw JSON value for the given canonical field.
pub fn normalize_value(
    field: ClaimField,
    raw: &JsonValue,
) -> Result<FieldValue, ValidationError> {
    match field.kind() {
        FieldKind::Amount | FieldKind::Number => normalize_numeric(field, raw),
        FieldKind::Date => Ok(normalize_date_value(field, raw)),
        FieldKind::Text => normalize_text(field, raw),
    }
}

fn normalize_numeric(field: ClaimField, raw: &JsonValue) -> Result<FieldValue, ValidationError> {
    match raw {
        JsonValue::Null => Ok(FieldValue::Null),
        JsonValue::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .ok_or_else(|| ValidationError::invalid(field.as_str(), "not representable as f64")),
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                // Empty string means "unset", never zero.
                return Ok(FieldValue::Null);
            }
            trimmed
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|_| ValidationError::invalid(field.as_str(), "not a numeric value"))
        }
        _ => Err(ValidationError::invalid(
            field.as_str(),
            "expected number, numeric string, or null",
        )),
    }
}

fn normalize_date_value(field: ClaimField, raw: &JsonValue) -> FieldValue {
    let text = match raw {
        JsonValue::Null => return FieldValue::Null,
        JsonValue::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };

    if text.is_empty() {
        return FieldValue::Null;
    }

    match normalize_date(&text) {
        Some(canonical) => FieldValue::Text(canonical),
        None => {
            // Kept verbatim rather than dropped: the operator's input must
            // survive even when we cannot make sense of it.
            tracing::warn!(field = field.as_str(), value = %text, "unparseable date left as-is");
            FieldValue::Text(text)
        }
    }
}

fn normalize_text(field: ClaimField, raw: &JsonValue) -> Result<FieldValue, ValidationError> {
    match raw {
        JsonValue::Null => Ok(FieldValue::Null),
        JsonValue::String(s) => {
            if s.trim().is_empty() {
                Ok(FieldValue::Null)
            } else {
                Ok(FieldValue::Text(s.clone()))
            }
        }
        JsonValue::Number(n) => Ok(FieldValue::Text(n.to_string())),
        JsonValue::Bool(b) => Ok(FieldValue::Text(b.to_string())),
        _ => Err(ValidationError::invalid(
            field.as_str(),
            "expected string or null",
        )),
    }
}

/// Normalize a raw partial-claim payload into a [`ClaimPatch`].
///
/// Unknown and legacy keys are dropped without error; each surviving value is
/// normalized per its field kind.
pub fn normalize_patch(
    raw: &serde_json::Map<String, JsonValue>,
) -> Result<ClaimPatch, ValidationError> {
    let mut patch = ClaimPatch::new();

    for (key, value) in raw {
        let Some(field) = ClaimField::parse(key) else {
            tracing::debug!(key = %key, "dropping non-canonical field from update payload");
            continue;
        };
        patch.set(field, normalize_value(field, value)?);
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_canonical_date_passes_through_unchanged() {
        assert_eq!(normalize_date("2025-03-04"), Some("2025-03-04".to_string()));
    }

    #[test]
    fn test_locale_date_normalizes() {
        assert_eq!(normalize_date("3/4/2025"), Some("2025-03-04".to_string()));
        assert_eq!(normalize_date("12/31/2024"), Some("2024-12-31".to_string()));
        assert_eq!(normalize_date("3-4-2025"), Some("2025-03-04".to_string()));
        assert_eq!(normalize_date("2025/03/04"), Some("2025-03-04".to_string()));
    }

    #[test]
    fn test_garbage_date_fails_to_normalize() {
        assert_eq!(normalize_date("sometime in spring"), None);
        assert_eq!(normalize_date("2025-13-40"), None);
    }

    #[test]
    fn test_empty_string_numeric_becomes_null() {
        let value = normalize_value(ClaimField::ChargeAmt, &json!("")).unwrap();
        assert_eq!(value, FieldValue::Null);

        let value = normalize_value(ClaimField::ChargeAmt, &json!("   ")).unwrap();
        assert_eq!(value, FieldValue::Null);
    }

    #[test]
    fn test_numeric_string_coerces() {
        let value = normalize_value(ClaimField::ChargeAmt, &json!("150.00")).unwrap();
        assert_eq!(value, FieldValue::Number(150.0));
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let err = normalize_value(ClaimField::ChargeAmt, &json!("a lot")).unwrap_err();
        assert!(format!("{}", err).contains("charge_amt"));
    }

    #[test]
    fn test_unparseable_date_kept_verbatim() {
        let value = normalize_value(ClaimField::ChargeDt, &json!("next tuesday")).unwrap();
        assert_eq!(value, FieldValue::Text("next tuesday".to_string()));
    }

    #[test]
    fn test_empty_text_becomes_null() {
        let value = normalize_value(ClaimField::Notes, &json!("")).unwrap();
        assert_eq!(value, FieldValue::Null);
    }

    #[test]
    fn test_patch_strips_legacy_and_unknown_keys() {
        let raw = json!({
            "charge_amt": "150.00",
            "visit_id": "V-1001",
            "patient_name": "Doe, Jane",
            "amount": 150,
            "status": "Paid",
            "made_up_field": true,
        });
        let patch = normalize_patch(raw.as_object().unwrap()).unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(ClaimField::ChargeAmt), Some(&FieldValue::Number(150.0)));
    }

    proptest! {
        /// Any valid calendar date round-trips through canonical form.
        #[test]
        fn prop_canonical_dates_round_trip(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let canonical = format!("{:04}-{:02}-{:02}", y, m, d);
            prop_assert_eq!(normalize_date(&canonical), Some(canonical.clone()));

            let locale = format!("{}/{}/{}", m, d, y);
            prop_assert_eq!(normalize_date(&locale), Some(canonical));
        }

        /// Numeric coercion never turns an empty-ish string into zero.
        #[test]
        fn prop_blank_numeric_is_null(ws in "[ \\t]{0,8}") {
            let value = normalize_value(ClaimField::Balance, &serde_json::json!(ws)).unwrap();
            prop_assert_eq!(value, FieldValue::Null);
        }
    }
}
