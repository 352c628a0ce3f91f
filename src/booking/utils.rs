use crate::{
    error::AppError,
    models::appointments::Appointment,
    utils::{format_date, parse_date_str},
};

use super::requests::BookingForm;

const MINUTES: [&str; 4] = ["00", "15", "30", "45"];

/// Checks a submitted form and builds the appointment it describes.
/// `id` and `booked_by` are left for the caller.
pub fn validate_booking(form: &BookingForm) -> Result<Appointment, AppError> {
    let patient_name = form.patient_name.trim();
    let phone_number = form.phone_number.trim();
    let doctor = form.doctor.trim();
    let date = form.date.trim();
    let hour = form.hour.trim();
    let minute = form.minute.trim();

    if [patient_name, phone_number, doctor, date, hour, minute]
        .iter()
        .any(|f| f.is_empty())
    {
        return Err(AppError::validation("Please fill all required fields."));
    }

    let date = parse_date_str(date).ok_or_else(|| AppError::validation("Invalid date."))?;
    let hour = match hour.parse::<u32>() {
        Ok(h) if h < 24 && hour.len() <= 2 && hour.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => return Err(AppError::validation("Invalid time.")),
    };
    if !MINUTES.contains(&minute) {
        return Err(AppError::validation("Invalid time."));
    }

    Ok(Appointment {
        id: String::new(),
        patient_name: patient_name.to_string(),
        phone_number: phone_number.to_string(),
        doctor: doctor.to_string(),
        date: format_date(&date),
        time: format!("{:02}:{}", hour, minute),
        booked_by: String::new(),
    })
}
