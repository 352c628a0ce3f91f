use serde::Deserialize;

/// The booking form as submitted; every field is checked by `validate_booking`.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BookingForm {
    pub patient_name: String,
    pub phone_number: String,
    pub doctor: String,
    pub date: String,
    pub hour: String,
    pub minute: String,
}

#[derive(Deserialize)]
pub struct DoctorsRequest {
    #[serde(default)]
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub login_token: String,
    #[serde(flatten)]
    pub form: BookingForm,
}

#[derive(Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub login_token: String,
    pub id: String,
    #[serde(flatten)]
    pub form: BookingForm,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub login_token: String,
    pub id: String,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub doctor: Option<String>,
}

#[derive(Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub login_token: String,
}
