//! Normalized field values.

use serde::{Deserialize, Serialize};

use crate::fields::FieldKind;

/// A single claim field value after normalization.
///
/// Dates are carried as canonical `YYYY-MM-DD` text (or verbatim text when
/// the input could not be parsed), so only three shapes exist on this side
/// of the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit unset. Serializes as JSON null.
    Null,
    /// Numeric value (amounts, identifiers, percentages).
    Number(f64),
    /// Text value (free text, status labels, canonical dates).
    Text(String),
}

impl FieldValue {
    /// True when the value is the explicit unset marker.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render this value as the text stored in a change-log row.
    ///
    /// `None` means SQL NULL. Amounts always carry two decimals so the log
    /// reads like the ledger it mirrors (`150` logs as `"150.00"`).
    pub fn log_text(&self, kind: FieldKind) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Number(n) => Some(match kind {
                FieldKind::Amount => format!("{:.2}", n),
                _ => format_minimal(*n),
            }),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Null,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::Text(s),
            None => FieldValue::Null,
        }
    }
}

impl From<&Option<String>> for FieldValue {
    fn from(value: &Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::Text(s.clone()),
            None => FieldValue::Null,
        }
    }
}

/// Format a number without trailing zeros (`42` not `42.0`, `80.5` as-is).
fn format_minimal(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_log_text_carries_two_decimals() {
        assert_eq!(
            FieldValue::Number(150.0).log_text(FieldKind::Amount),
            Some("150.00".to_string())
        );
        assert_eq!(
            FieldValue::Number(19.5).log_text(FieldKind::Amount),
            Some("19.50".to_string())
        );
    }

    #[test]
    fn test_number_log_text_is_minimal() {
        assert_eq!(
            FieldValue::Number(99213.0).log_text(FieldKind::Number),
            Some("99213".to_string())
        );
        assert_eq!(
            FieldValue::Number(80.5).log_text(FieldKind::Number),
            Some("80.5".to_string())
        );
    }

    #[test]
    fn test_null_log_text_is_sql_null() {
        assert_eq!(FieldValue::Null.log_text(FieldKind::Amount), None);
        assert_eq!(FieldValue::Null.log_text(FieldKind::Text), None);
    }

    #[test]
    fn test_text_log_text_is_verbatim() {
        assert_eq!(
            FieldValue::Text("Prim Denied".to_string()).log_text(FieldKind::Text),
            Some("Prim Denied".to_string())
        );
    }
}
