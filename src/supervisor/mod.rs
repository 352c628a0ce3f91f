mod requests;
mod responses;
mod utils;

use std::sync::Arc;

use crate::{
    auth::{
        accounts::{create_account, NewAccount},
        utils::session_context,
    },
    blob::{blob_path, BlobStore, DOCUMENT_PREFIX, SHEET_PREFIX, VOICE_PREFIX},
    database::{self, assert::assert_staff, encode, list, Collection},
    error::AppError,
    gate::{self, Section},
    models::{
        appointments::Appointment,
        doctors::Doctor,
        evaluations::VoiceEvaluation,
        users::{StaffProfile, UpdateScores},
    },
    protocol::{CreatedResponse, SimpleResponse, UploadResponse},
    reconcile::{self, MatchPolicy},
    spreadsheet::parse_sheet,
    utils::blocking,
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;

use self::{requests::*, responses::*, utils::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(appointments)
        .service(compare)
        .service(uploads)
        .service(staff)
        .service(add_staff)
        .service(save_scores)
        .service(upload_document)
        .service(upload_voice)
        .service(evaluate)
        .service(evaluations)
        .service(add_doctor);
}

crate::post_funcs! {
    (appointments, "/appointments", AppointmentsRequest, AppointmentsResponse),
    (uploads, "/uploads", UploadsRequest, UploadsResponse),
    (staff, "/staff", StaffRequest, StaffResponse),
    (add_staff, "/add_staff", AddStaffRequest, CreatedResponse),
    (save_scores, "/save_scores", SaveScoresRequest, SimpleResponse),
    (evaluate, "/evaluate", EvaluateRequest, CreatedResponse),
    (evaluations, "/evaluations", EvaluationsRequest, EvaluationsResponse),
    (add_doctor, "/add_doctor", AddDoctorRequest, CreatedResponse),
}

crate::upload_funcs! {
    (compare, "/compare", CompareQuery, CompareResponse),
    (upload_document, "/upload_document", StaffUploadQuery, UploadResponse),
    (upload_voice, "/upload_voice", StaffUploadQuery, UploadResponse),
}

async fn put_blob(
    blobs: &Arc<dyn BlobStore>,
    path: String,
    body: web::Bytes,
) -> Result<String, AppError> {
    let blobs = Arc::clone(blobs);
    blocking(move || blobs.put(&path, &body)).await
}

async fn appointments_impl(
    state: web::Data<AppState>,
    info: web::Json<AppointmentsRequest>,
) -> Result<AppointmentsResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let date = info.date.filter(|d| !d.is_empty());
    let doctor = info.doctor.filter(|d| !d.is_empty());
    let booked_by = info.booked_by.filter(|b| !b.is_empty());
    let stored = database::run(&state.store, |store| {
        list::<Appointment>(store, Collection::Appointments)
    })
    .await?;

    let items = stored
        .into_iter()
        .filter(|a| date.as_ref().map_or(true, |d| &a.date == d))
        .filter(|a| doctor.as_ref().map_or(true, |d| &a.doctor == d))
        .filter(|a| {
            booked_by
                .as_ref()
                .map_or(true, |b| a.booked_by.eq_ignore_ascii_case(b))
        })
        .map(|a| AppointmentItem {
            id: a.id,
            patient_name: a.patient_name,
            phone_number: a.phone_number,
            doctor: a.doctor,
            date: a.date,
            time: a.time,
            booked_by: a.booked_by,
        })
        .collect();

    Ok(AppointmentsResponse {
        success: true,
        err: "".to_string(),
        appointments: items,
    })
}

/// Audit of an uploaded sheet against every stored appointment. The sheet is
/// archived only once it parses.
async fn compare_impl(
    state: web::Data<AppState>,
    query: web::Query<CompareQuery>,
    body: web::Bytes,
) -> Result<CompareResponse, AppError> {
    let query = query.into_inner();
    let ctx = session_context(&state, &query.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    if body.is_empty() {
        return Err(AppError::validation("Please select a file."));
    }
    let path = blob_path(&[SHEET_PREFIX, query.file_name.as_str()])?;
    let rows = parse_sheet(&body)?;

    let file_url = put_blob(&state.blobs, path, body).await?;
    let records = database::run(&state.store, |store| {
        list::<Appointment>(store, Collection::Appointments)
    })
    .await?;

    let classified = reconcile::reconcile(&rows, &records, MatchPolicy::Strict);
    let summary = reconcile::summarize(&classified);
    tracing::info!(
        file = %query.file_name,
        total = summary.total,
        matched = summary.matched,
        "sheet reconciled"
    );

    Ok(CompareResponse {
        success: true,
        err: "".to_string(),
        total: summary.total,
        matched: summary.matched,
        mismatches: summary.mismatched,
        file_url,
    })
}

async fn uploads_impl(
    state: web::Data<AppState>,
    info: web::Json<UploadsRequest>,
) -> Result<UploadsResponse, AppError> {
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let blobs = Arc::clone(&state.blobs);
    let urls = blocking(move || blobs.list(SHEET_PREFIX)).await?;

    Ok(UploadsResponse {
        success: true,
        err: "".to_string(),
        urls,
    })
}

async fn staff_impl(
    state: web::Data<AppState>,
    info: web::Json<StaffRequest>,
) -> Result<StaffResponse, AppError> {
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let profiles = database::run(&state.store, |store| {
        list::<StaffProfile>(store, Collection::Users)
    })
    .await?;

    let blobs = Arc::clone(&state.blobs);
    let items = blocking(move || {
        profiles
            .into_iter()
            .map(|p| -> anyhow::Result<StaffItem> {
                let documents = blobs.list(&format!("{}/{}", DOCUMENT_PREFIX, p.id))?;
                Ok(StaffItem {
                    id: p.id,
                    email: p.email,
                    display_name: p.display_name,
                    role: p.role,
                    image_url: p.image_url,
                    policy_score: p.policy_score,
                    call_score: p.call_score,
                    attendance_score: p.attendance_score,
                    supervisor_note: p.supervisor_note,
                    leave_dates: p.leave_dates,
                    documents,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;

    Ok(StaffResponse {
        success: true,
        err: "".to_string(),
        staff: items,
    })
}

async fn add_staff_impl(
    state: web::Data<AppState>,
    info: web::Json<AddStaffRequest>,
) -> Result<CreatedResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let account = NewAccount {
        email: info.email,
        password: info.password,
        display_name: info.display_name,
        role: info.role,
    };
    let id = database::run(&state.store, move |store| create_account(store, account)).await?;

    tracing::info!(%id, "staff account created");
    Ok(CreatedResponse::ok(id))
}

async fn save_scores_impl(
    state: web::Data<AppState>,
    info: web::Json<SaveScoresRequest>,
) -> Result<SimpleResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let data = UpdateScores {
        policy_score: info.policy_score.trim().to_string(),
        call_score: info.call_score.trim().to_string(),
        attendance_score: info.attendance_score.trim().to_string(),
        supervisor_note: info.supervisor_note,
        leave_dates: clean_leave_dates(info.leave_dates)?,
    };

    let staff_id = info.staff_id;
    database::run(&state.store, move |store| {
        assert_staff(store, &staff_id)?;
        store.update(Collection::Users, &staff_id, encode(&data)?)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn upload_staff_file(
    state: &web::Data<AppState>,
    query: StaffUploadQuery,
    body: web::Bytes,
    prefix: &'static str,
) -> Result<String, AppError> {
    let ctx = session_context(state, &query.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    if body.is_empty() {
        return Err(AppError::validation("Please select a file."));
    }
    let path = blob_path(&[prefix, query.staff_id.as_str(), query.file_name.as_str()])?;

    let staff_id = query.staff_id;
    database::run(&state.store, move |store| assert_staff(store, &staff_id)).await?;
    put_blob(&state.blobs, path, body).await
}

async fn upload_document_impl(
    state: web::Data<AppState>,
    query: web::Query<StaffUploadQuery>,
    body: web::Bytes,
) -> Result<UploadResponse, AppError> {
    let url = upload_staff_file(&state, query.into_inner(), body, DOCUMENT_PREFIX).await?;
    Ok(UploadResponse::ok(url))
}

async fn upload_voice_impl(
    state: web::Data<AppState>,
    query: web::Query<StaffUploadQuery>,
    body: web::Bytes,
) -> Result<UploadResponse, AppError> {
    let url = upload_staff_file(&state, query.into_inner(), body, VOICE_PREFIX).await?;
    Ok(UploadResponse::ok(url))
}

async fn evaluate_impl(
    state: web::Data<AppState>,
    info: web::Json<EvaluateRequest>,
) -> Result<CreatedResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    if info.audio_url.is_empty() {
        return Err(AppError::validation("Please select an audio file."));
    }
    let score = score_breakdown(&info.scores)?;

    let id = database::run(&state.store, move |store| {
        let profile = assert_staff(store, &info.staff_id)?;
        let evaluation = VoiceEvaluation {
            id: String::new(),
            staff_id: info.staff_id,
            staff_name: profile.display_name,
            audio_url: info.audio_url,
            score,
            breakdown: info.scores,
            notes: info.notes,
            timestamp: Utc::now(),
        };
        store.insert(Collection::VoiceEvaluations, encode(&evaluation)?)
    })
    .await?;

    Ok(CreatedResponse::ok(id))
}

async fn evaluations_impl(
    state: web::Data<AppState>,
    info: web::Json<EvaluationsRequest>,
) -> Result<EvaluationsResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let staff_id = info.staff_id;
    let mut history = database::run(&state.store, move |store| {
        assert_staff(store, &staff_id)?;
        let all = list::<VoiceEvaluation>(store, Collection::VoiceEvaluations)?;
        Ok(all
            .into_iter()
            .filter(|e| e.staff_id == staff_id)
            .collect::<Vec<_>>())
    })
    .await?;
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let average = average_score(&history);
    Ok(EvaluationsResponse {
        success: true,
        err: "".to_string(),
        average,
        evaluations: history
            .into_iter()
            .map(|e| EvaluationItem {
                id: e.id,
                staff_name: e.staff_name,
                audio_url: e.audio_url,
                score: e.score,
                breakdown: e.breakdown,
                notes: e.notes,
                timestamp: e.timestamp,
            })
            .collect(),
    })
}

async fn add_doctor_impl(
    state: web::Data<AppState>,
    info: web::Json<AddDoctorRequest>,
) -> Result<CreatedResponse, AppError> {
    let info = info.into_inner();
    let ctx = session_context(&state, &info.login_token).await?;
    gate::require(&ctx, Section::Supervisor)?;

    let name = info.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Please fill all required fields."));
    }
    let doctor = Doctor {
        name,
        specialty: info.specialty.trim().to_string(),
        ..Default::default()
    };

    let id = database::run(&state.store, move |store| {
        let doctors = list::<Doctor>(store, Collection::Doctors)?;
        if doctors.iter().any(|d| d.name == doctor.name) {
            anyhow::bail!(AppError::validation("Doctor already exists"));
        }
        store.insert(Collection::Doctors, encode(&doctor)?)
    })
    .await?;

    Ok(CreatedResponse::ok(id))
}
