use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::spreadsheet::ImportedRow;

#[derive(Default, Serialize)]
pub struct AppointmentItem {
    pub id: String,
    pub patient_name: String,
    pub phone_number: String,
    pub doctor: String,
    pub date: String,
    pub time: String,
    pub booked_by: String,
}

#[derive(Default, Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub err: String,
    pub total: usize,
    pub matched: usize,
    pub mismatches: Vec<ImportedRow>,
    /// Where the uploaded sheet was archived.
    pub file_url: String,
}

#[derive(Default, Serialize)]
pub struct UploadsResponse {
    pub success: bool,
    pub err: String,
    pub urls: Vec<String>,
}

#[derive(Default, Serialize)]
pub struct StaffItem {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub image_url: String,
    pub policy_score: String,
    pub call_score: String,
    pub attendance_score: String,
    pub supervisor_note: String,
    pub leave_dates: Vec<String>,
    pub documents: Vec<String>,
}

#[derive(Default, Serialize)]
pub struct StaffResponse {
    pub success: bool,
    pub err: String,
    pub staff: Vec<StaffItem>,
}

#[derive(Serialize)]
pub struct EvaluationItem {
    pub id: String,
    pub staff_name: String,
    pub audio_url: String,
    pub score: Option<f64>,
    pub breakdown: BTreeMap<String, u8>,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default, Serialize)]
pub struct EvaluationsResponse {
    pub success: bool,
    pub err: String,
    pub evaluations: Vec<EvaluationItem>,
    /// Mean of the scored evaluations, to two decimals.
    pub average: Option<f64>,
}

crate::impl_err_response! {
    AppointmentsResponse,
    CompareResponse,
    UploadsResponse,
    StaffResponse,
    EvaluationsResponse,
}
