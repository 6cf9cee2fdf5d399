//! The claim record.

use serde::{Deserialize, Serialize};

use crate::fields::ClaimField;
use crate::patch::ClaimPatch;
use crate::value::FieldValue;
use crate::ClaimId;

/// Claim - one row per billable visit / CPT line item.
///
/// Claims are created externally and mutated field-by-field through partial
/// updates; this system never deletes them. Nullable fields use `None` to
/// mean "unset" - an empty string is never stored. Date fields hold canonical
/// `YYYY-MM-DD` text (or the operator's verbatim input when it could not be
/// parsed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Claim {
    pub id: ClaimId,

    // Patient identity
    pub patient_id: Option<String>,
    pub patient_first_name: Option<String>,
    pub patient_last_name: Option<String>,
    pub dob: Option<String>,

    // Procedure and service window
    pub cpt_code: Option<String>,
    pub cpt_id: Option<i64>,
    pub service_start: Option<String>,
    pub service_end: Option<String>,

    // Lifecycle labels (any string accepted; see `status` module for the
    // well-known set driving UI color-coding)
    pub claim_status: Option<String>,
    pub status_type: Option<String>,

    // Charge
    pub charge_dt: Option<String>,
    pub charge_amt: Option<f64>,
    pub allowed_amt: Option<f64>,
    pub total_amt: Option<f64>,
    pub write_off: Option<f64>,
    pub balance: Option<f64>,
    pub reimb_pct: Option<f64>,

    // Primary insurance
    pub prim_payer: Option<String>,
    pub prim_amt: Option<f64>,
    pub prim_post_dt: Option<String>,
    pub prim_recv_dt: Option<String>,
    pub prim_chk_det: Option<String>,
    pub prim_chk_amt: Option<f64>,
    pub prim_cmt: Option<String>,
    pub prim_denial_code: Option<String>,

    // Secondary insurance
    pub sec_payer: Option<String>,
    pub sec_amt: Option<f64>,
    pub sec_post_dt: Option<String>,
    pub sec_recv_dt: Option<String>,
    pub sec_chk_det: Option<String>,
    pub sec_chk_amt: Option<f64>,
    pub sec_cmt: Option<String>,
    pub sec_denial_code: Option<String>,

    // Patient responsibility
    pub pat_amt: Option<f64>,
    pub pat_recv_dt: Option<String>,

    pub notes: Option<String>,
}

impl Claim {
    /// The current value of a canonical field, in normalized form.
    pub fn field_value(&self, field: ClaimField) -> FieldValue {
        match field {
            ClaimField::PatientId => (&self.patient_id).into(),
            ClaimField::PatientFirstName => (&self.patient_first_name).into(),
            ClaimField::PatientLastName => (&self.patient_last_name).into(),
            ClaimField::Dob => (&self.dob).into(),
            ClaimField::CptCode => (&self.cpt_code).into(),
            ClaimField::CptId => self.cpt_id.map(|n| n as f64).into(),
            ClaimField::ServiceStart => (&self.service_start).into(),
            ClaimField::ServiceEnd => (&self.service_end).into(),
            ClaimField::ClaimStatus => (&self.claim_status).into(),
            ClaimField::StatusType => (&self.status_type).into(),
            ClaimField::ChargeDt => (&self.charge_dt).into(),
            ClaimField::ChargeAmt => self.charge_amt.into(),
            ClaimField::AllowedAmt => self.allowed_amt.into(),
            ClaimField::TotalAmt => self.total_amt.into(),
            ClaimField::WriteOff => self.write_off.into(),
            ClaimField::Balance => self.balance.into(),
            ClaimField::ReimbPct => self.reimb_pct.into(),
            ClaimField::PrimPayer => (&self.prim_payer).into(),
            ClaimField::PrimAmt => self.prim_amt.into(),
            ClaimField::PrimPostDt => (&self.prim_post_dt).into(),
            ClaimField::PrimRecvDt => (&self.prim_recv_dt).into(),
            ClaimField::PrimChkDet => (&self.prim_chk_det).into(),
            ClaimField::PrimChkAmt => self.prim_chk_amt.into(),
            ClaimField::PrimCmt => (&self.prim_cmt).into(),
            ClaimField::PrimDenialCode => (&self.prim_denial_code).into(),
            ClaimField::SecPayer => (&self.sec_payer).into(),
            ClaimField::SecAmt => self.sec_amt.into(),
            ClaimField::SecPostDt => (&self.sec_post_dt).into(),
            ClaimField::SecRecvDt => (&self.sec_recv_dt).into(),
            ClaimField::SecChkDet => (&self.sec_chk_det).into(),
            ClaimField::SecChkAmt => self.sec_chk_amt.into(),
            ClaimField::SecCmt => (&self.sec_cmt).into(),
            ClaimField::SecDenialCode => (&self.sec_denial_code).into(),
            ClaimField::PatAmt => self.pat_amt.into(),
            ClaimField::PatRecvDt => (&self.pat_recv_dt).into(),
            ClaimField::Notes => (&self.notes).into(),
        }
    }

    /// Overwrite a canonical field with a normalized value.
    pub fn set_field(&mut self, field: ClaimField, value: &FieldValue) {
        match field {
            ClaimField::PatientId => self.patient_id = as_text(value),
            ClaimField::PatientFirstName => self.patient_first_name = as_text(value),
            ClaimField::PatientLastName => self.patient_last_name = as_text(value),
            ClaimField::Dob => self.dob = as_text(value),
            ClaimField::CptCode => self.cpt_code = as_text(value),
            ClaimField::CptId => self.cpt_id = value.as_number().map(|n| n as i64),
            ClaimField::ServiceStart => self.service_start = as_text(value),
            ClaimField::ServiceEnd => self.service_end = as_text(value),
            ClaimField::ClaimStatus => self.claim_status = as_text(value),
            ClaimField::StatusType => self.status_type = as_text(value),
            ClaimField::ChargeDt => self.charge_dt = as_text(value),
            ClaimField::ChargeAmt => self.charge_amt = value.as_number(),
            ClaimField::AllowedAmt => self.allowed_amt = value.as_number(),
            ClaimField::TotalAmt => self.total_amt = value.as_number(),
            ClaimField::WriteOff => self.write_off = value.as_number(),
            ClaimField::Balance => self.balance = value.as_number(),
            ClaimField::ReimbPct => self.reimb_pct = value.as_number(),
            ClaimField::PrimPayer => self.prim_payer = as_text(value),
            ClaimField::PrimAmt => self.prim_amt = value.as_number(),
            ClaimField::PrimPostDt => self.prim_post_dt = as_text(value),
            ClaimField::PrimRecvDt => self.prim_recv_dt = as_text(value),
            ClaimField::PrimChkDet => self.prim_chk_det = as_text(value),
            ClaimField::PrimChkAmt => self.prim_chk_amt = value.as_number(),
            ClaimField::PrimCmt => self.prim_cmt = as_text(value),
            ClaimField::PrimDenialCode => self.prim_denial_code = as_text(value),
            ClaimField::SecPayer => self.sec_payer = as_text(value),
            ClaimField::SecAmt => self.sec_amt = value.as_number(),
            ClaimField::SecPostDt => self.sec_post_dt = as_text(value),
            ClaimField::SecRecvDt => self.sec_recv_dt = as_text(value),
            ClaimField::SecChkDet => self.sec_chk_det = as_text(value),
            ClaimField::SecChkAmt => self.sec_chk_amt = value.as_number(),
            ClaimField::SecCmt => self.sec_cmt = as_text(value),
            ClaimField::SecDenialCode => self.sec_denial_code = as_text(value),
            ClaimField::PatAmt => self.pat_amt = value.as_number(),
            ClaimField::PatRecvDt => self.pat_recv_dt = as_text(value),
            ClaimField::Notes => self.notes = as_text(value),
        }
    }

    /// Apply every field of a normalized patch to this claim.
    pub fn apply_patch(&mut self, patch: &ClaimPatch) {
        for (field, value) in patch.iter() {
            self.set_field(field, value);
        }
    }

    /// Derived display name, `"Last, First"`.
    ///
    /// Mirrors the legacy `patient_name` payload key; derived only, never
    /// written back.
    pub fn patient_display_name(&self) -> String {
        match (&self.patient_last_name, &self.patient_first_name) {
            (Some(last), Some(first)) => format!("{}, {}", last, first),
            (Some(last), None) => last.clone(),
            (None, Some(first)) => first.clone(),
            (None, None) => String::new(),
        }
    }
}

fn as_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Number(n) => Some(n.to_string()),
    }
}
