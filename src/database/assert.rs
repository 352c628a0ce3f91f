use anyhow::bail;

use super::{fetch, list, Collection, RecordStore};
use crate::{
    error::AppError,
    models::{appointments::Appointment, doctors::Doctor, users::StaffProfile},
};

pub fn assert_doctor(store: &dyn RecordStore, name: &str) -> anyhow::Result<()> {
    let doctors = list::<Doctor>(store, Collection::Doctors)?;
    if !doctors.iter().any(|d| d.name == name) {
        bail!(AppError::NotFound("No such doctor"));
    }
    Ok(())
}

pub fn assert_appointment(store: &dyn RecordStore, id: &str) -> anyhow::Result<Appointment> {
    match fetch::<Appointment>(store, Collection::Appointments, id)? {
        Some(appt) => Ok(appt),
        None => bail!(AppError::NotFound("No such appointment")),
    }
}

pub fn assert_staff(store: &dyn RecordStore, id: &str) -> anyhow::Result<StaffProfile> {
    match fetch::<StaffProfile>(store, Collection::Users, id)? {
        Some(profile) => Ok(profile),
        None => bail!(AppError::NotFound("No such staff member")),
    }
}

pub fn assert_email_free(store: &dyn RecordStore, email: &str) -> anyhow::Result<()> {
    let users = list::<StaffProfile>(store, Collection::Users)?;
    if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
        bail!(AppError::validation("Email already registered"));
    }
    Ok(())
}
