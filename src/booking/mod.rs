mod requests;
mod responses;
mod utils;

use crate::{
    auth::utils::session_context,
    database::{
        self,
        assert::{assert_appointment, assert_doctor},
        encode, list, Collection,
    },
    error::AppError,
    gate::{self, Section},
    models::{
        appointments::{Appointment, UpdateAppointment},
        doctors::Doctor,
    },
    protocol::{CreatedResponse, SimpleResponse},
    reconcile::{self, MatchPolicy},
    spreadsheet::parse_sheet,
    utils::today_str,
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

use self::{requests::*, responses::*, utils::validate_booking};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(doctors)
        .service(book)
        .service(edit)
        .service(delete)
        .service(search)
        .service(compare);
}

crate::post_funcs! {
    (doctors, "/doctors", DoctorsRequest, DoctorsResponse),
    (book, "/book", BookRequest, CreatedResponse),
    (edit, "/edit", EditRequest, SimpleResponse),
    (delete, "/delete", DeleteRequest, SimpleResponse),
    (search, "/search", SearchRequest, SearchResponse),
}

crate::upload_funcs! {
    (compare, "/compare", CompareQuery, CompareResponse),
}

async fn doctors_impl(
    state: web::Data<AppState>,
    info: web::Json<DoctorsRequest>,
) -> Result<DoctorsResponse, AppError> {
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Booking)?;

    let found = database::run(&state.store, |store| {
        list::<Doctor>(store, Collection::Doctors)
    })
    .await?;

    Ok(DoctorsResponse {
        success: true,
        err: "".to_string(),
        doctors: found
            .into_iter()
            .map(|d| DoctorItem {
                id: d.id,
                name: d.name,
                specialty: d.specialty,
            })
            .collect(),
    })
}

async fn book_impl(
    state: web::Data<AppState>,
    info: web::Json<BookRequest>,
) -> Result<CreatedResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    let principal = gate::require(&ctx, Section::Booking)?;

    let mut appt = validate_booking(&info.form)?;
    appt.booked_by = principal.label().to_string();

    let id = database::run(&state.store, move |store| {
        assert_doctor(store, &appt.doctor)?;
        store.insert(Collection::Appointments, encode(&appt)?)
    })
    .await?;

    tracing::info!(%id, booked_by = %principal.uid, "appointment created");
    Ok(CreatedResponse::ok(id))
}

async fn edit_impl(
    state: web::Data<AppState>,
    info: web::Json<EditRequest>,
) -> Result<SimpleResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Booking)?;

    let appt = validate_booking(&info.form)?;
    let data = UpdateAppointment {
        patient_name: Some(appt.patient_name),
        phone_number: Some(appt.phone_number),
        doctor: Some(appt.doctor),
        date: Some(appt.date),
        time: Some(appt.time),
    };

    let id = info.id;
    database::run(&state.store, move |store| {
        assert_appointment(store, &id)?;
        if let Some(doctor) = &data.doctor {
            assert_doctor(store, doctor)?;
        }
        store.update(Collection::Appointments, &id, encode(&data)?)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn delete_impl(
    state: web::Data<AppState>,
    info: web::Json<DeleteRequest>,
) -> Result<SimpleResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Booking)?;

    let id = info.id;
    database::run(&state.store, move |store| {
        assert_appointment(store, &id)?;
        store.delete(Collection::Appointments, &id)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_impl(
    state: web::Data<AppState>,
    info: web::Json<SearchRequest>,
) -> Result<SearchResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Booking)?;

    let date = info.date.filter(|d| !d.is_empty());
    let doctor = info.doctor.filter(|d| !d.is_empty());
    let appointments = database::run(&state.store, |store| {
        list::<Appointment>(store, Collection::Appointments)
    })
    .await?;

    let today = today_str();
    let appointments = appointments
        .into_iter()
        .filter(|a| date.as_ref().map_or(true, |d| &a.date == d))
        .filter(|a| doctor.as_ref().map_or(true, |d| &a.doctor == d))
        .map(|a| AppointmentItem {
            today: a.date == today,
            id: a.id,
            patient_name: a.patient_name,
            phone_number: a.phone_number,
            doctor: a.doctor,
            date: a.date,
            time: a.time,
            booked_by: a.booked_by,
        })
        .collect();

    Ok(SearchResponse {
        success: true,
        err: "".to_string(),
        appointments,
    })
}

/// Receptionist self-check: the caller's own rows from an uploaded sheet,
/// each flagged by the lenient policy.
async fn compare_impl(
    state: web::Data<AppState>,
    query: web::Query<CompareQuery>,
    body: web::Bytes,
) -> Result<CompareResponse, AppError> {
    let ctx = session_context(&state, &query.login_token).await?;
    let principal = gate::require(&ctx, Section::Booking)?;

    if body.is_empty() {
        return Err(AppError::validation("Please select a file."));
    }
    let rows = parse_sheet(&body)?;
    let rows = reconcile::rows_booked_by(rows, Some(principal.display_name.as_str()));

    let records = database::run(&state.store, |store| {
        list::<Appointment>(store, Collection::Appointments)
    })
    .await?;

    let classified = reconcile::reconcile(&rows, &records, MatchPolicy::Lenient);
    let summary = reconcile::summarize(&classified);
    Ok(CompareResponse {
        success: true,
        err: "".to_string(),
        total: summary.total,
        matched: summary.matched,
        rows: classified,
    })
}
