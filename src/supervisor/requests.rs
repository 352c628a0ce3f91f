use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct AppointmentsRequest {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub booked_by: Option<String>,
}

#[derive(Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Deserialize)]
pub struct UploadsRequest {
    #[serde(default)]
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct StaffRequest {
    #[serde(default)]
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct AddStaffRequest {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize)]
pub struct SaveScoresRequest {
    #[serde(default)]
    pub login_token: String,
    pub staff_id: String,
    #[serde(default)]
    pub policy_score: String,
    #[serde(default)]
    pub call_score: String,
    #[serde(default)]
    pub attendance_score: String,
    #[serde(default)]
    pub supervisor_note: String,
    #[serde(default)]
    pub leave_dates: Vec<String>,
}

/// Query of a staff file upload; the file itself is the request body.
#[derive(Deserialize)]
pub struct StaffUploadQuery {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub login_token: String,
    pub staff_id: String,
    /// URL returned by `upload_voice`.
    #[serde(default)]
    pub audio_url: String,
    /// Criterion → score. Criteria left out were not scored.
    #[serde(default)]
    pub scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct EvaluationsRequest {
    #[serde(default)]
    pub login_token: String,
    pub staff_id: String,
}

#[derive(Deserialize)]
pub struct AddDoctorRequest {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}
