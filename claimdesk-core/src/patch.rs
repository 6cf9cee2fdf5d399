//! Partial claim updates and field-level diffing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::claim::Claim;
use crate::fields::ClaimField;
use crate::value::FieldValue;

/// A normalized partial update, keyed by canonical field.
///
/// Ordering is deterministic (column order of the `ClaimField` enum), so the
/// change-log rows an update produces land in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimPatch(BTreeMap<ClaimField, FieldValue>);

impl ClaimPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's target value, replacing any earlier value.
    pub fn set(&mut self, field: ClaimField, value: FieldValue) -> &mut Self {
        self.0.insert(field, value);
        self
    }

    pub fn get(&self, field: ClaimField) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClaimField, &FieldValue)> {
        self.0.iter().map(|(f, v)| (*f, v))
    }

    /// Render the patch back into a JSON object for the wire.
    ///
    /// Numeric fields serialize as number-or-null, never as strings; date
    /// fields carry their canonical text.
    pub fn to_json_map(&self) -> serde_json::Map<String, JsonValue> {
        let mut map = serde_json::Map::new();
        for (field, value) in self.iter() {
            let json = match value {
                FieldValue::Null => JsonValue::Null,
                FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null),
                FieldValue::Text(s) => JsonValue::String(s.clone()),
            };
            map.insert(field.as_str().to_string(), json);
        }
        map
    }
}

/// One field whose value actually changed in an update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: ClaimField,
    pub old: FieldValue,
    pub new: FieldValue,
}

impl FieldChange {
    /// Change-log text for the previous value (`None` = SQL NULL).
    pub fn old_text(&self) -> Option<String> {
        self.old.log_text(self.field.kind())
    }

    /// Change-log text for the new value (`None` = SQL NULL).
    pub fn new_text(&self) -> Option<String> {
        self.new.log_text(self.field.kind())
    }
}

/// Diff a normalized patch against the stored claim row.
///
/// Fields present in the patch whose value equals the stored value produce
/// no change; everything else yields one [`FieldChange`] carrying the old
/// and new values.
pub fn diff_against(patch: &ClaimPatch, stored: &Claim) -> Vec<FieldChange> {
    patch
        .iter()
        .filter_map(|(field, new)| {
            let old = stored.field_value(field);
            if &old == new {
                None
            } else {
                Some(FieldChange {
                    field,
                    old,
                    new: new.clone(),
                })
            }
        })
        .collect()
}
