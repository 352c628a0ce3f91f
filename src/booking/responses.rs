use serde::Serialize;

use crate::reconcile::Classified;

#[derive(Default, Serialize)]
pub struct DoctorItem {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

#[derive(Default, Serialize)]
pub struct DoctorsResponse {
    pub success: bool,
    pub err: String,
    pub doctors: Vec<DoctorItem>,
}

#[derive(Default, Serialize)]
pub struct AppointmentItem {
    pub id: String,
    pub patient_name: String,
    pub phone_number: String,
    pub doctor: String,
    pub date: String,
    pub time: String,
    pub booked_by: String,
    pub today: bool,
}

#[derive(Default, Serialize)]
pub struct SearchResponse {
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
    pub rows: Vec<Classified>,
}

crate::impl_err_response! {
    DoctorsResponse,
    SearchResponse,
    CompareResponse,
}
