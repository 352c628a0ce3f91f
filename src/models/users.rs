use serde::{Deserialize, Serialize};

/// A document in the `users` collection: sign-in identity plus the
/// supervisor-maintained profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub password_hash: String,
    pub password_salt: String,
    pub image_url: String,
    pub policy_score: String,
    pub call_score: String,
    pub attendance_score: String,
    pub supervisor_note: String,
    pub leave_dates: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScores {
    pub policy_score: String,
    pub call_score: String,
    pub attendance_score: String,
    pub supervisor_note: String,
    pub leave_dates: Vec<String>,
}
