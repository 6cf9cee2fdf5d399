//! Claim status labels.
//!
//! Statuses are free-form strings server-side - any label is accepted and
//! stored verbatim. The well-known set below exists for UI color-coding
//! only; it is not a state machine and nothing enforces transitions.

use serde::{Deserialize, Serialize};

pub const PENDING: &str = "Pending";
pub const BILLED: &str = "Billed";
pub const INSURANCE_PAID: &str = "Insurance Paid";
pub const PRIM_DENIED: &str = "Prim Denied";
pub const SEC_DENIED: &str = "Sec Denied";
pub const PATIENT_BALANCE: &str = "Patient Balance";
pub const PAID_IN_FULL: &str = "Paid in Full";
pub const WRITE_OFF: &str = "Write Off";

/// Color bucket a status label maps to in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
    Blue,
    Gray,
}

/// Map a status label to its display color. Unknown labels render gray.
pub fn color_hint(status: &str) -> StatusColor {
    match status {
        INSURANCE_PAID | PAID_IN_FULL => StatusColor::Green,
        PENDING | BILLED => StatusColor::Yellow,
        PRIM_DENIED | SEC_DENIED => StatusColor::Red,
        PATIENT_BALANCE => StatusColor::Blue,
        WRITE_OFF => StatusColor::Gray,
        _ => StatusColor::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_have_colors() {
        assert_eq!(color_hint(INSURANCE_PAID), StatusColor::Green);
        assert_eq!(color_hint(PRIM_DENIED), StatusColor::Red);
    }

    #[test]
    fn test_unknown_label_is_accepted_and_gray() {
        assert_eq!(color_hint("Escalated To Billing Lead"), StatusColor::Gray);
    }
}
