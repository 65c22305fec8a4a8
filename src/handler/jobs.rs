// handler/jobs.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use bigdecimal::BigDecimal;

use crate::{
    db::jobdb::{JobExt, NewApplication, NewJob},
    dtos::{jobdtos::*, userdtos::RequestQueryDto},
    error::{ErrorMessage, HttpError},
    middleware::main_middleware::JWTAuthMiddeware,
    models::{
        jobmodel::{ApplicationStatus, JobStatus},
        profilemodel::ProfileRole,
    },
    service::error::ServiceError,
    utils::decimal::{money_from_f64, BigDecimalHelpers},
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", post(create_job).get(list_jobs))
        .route("/mine", get(list_my_jobs))
        .route("/:job_id", get(get_job))
        .route("/:job_id/apply", post(apply))
        .route("/:job_id/applications", get(list_job_applications))
        .route("/:job_id/finish", put(finish_job))
        .route("/:job_id/cancel", put(cancel_job))
        .route("/:job_id/report", get(get_job_report))
        .route("/:job_id/attendance", get(get_attendance_tracking))
        .route("/applications/mine", get(list_my_applications))
        .route("/applications/:application_id/accept", put(accept_application))
        .route("/applications/:application_id/reject", put(reject_application))
        .route("/applications/:application_id/withdraw", put(withdraw_application))
        .route("/applications/:application_id/release", put(release_payment))
}

fn require_role(user: &JWTAuthMiddeware, role: ProfileRole) -> Result<(), HttpError> {
    if user.profile.role != role {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }
    Ok(())
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let pay_rate = money_from_f64(body.pay_rate)
        .ok_or_else(|| HttpError::from(ServiceError::InvalidAmount))?;

    let job = app_state
        .db_client
        .create_job(NewJob {
            organizer_id: user.profile.id,
            title: body.title,
            event_type: body.event_type,
            role_needed: body.role_needed,
            number_of_staff: body.number_of_staff,
            skills: body.skills,
            event_date: body.event_date,
            location: body.location,
            pay_rate,
            description: body.description,
            requirements: body.requirements,
            is_draft: body.is_draft,
        })
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = JobResponseDto {
        status: "success".to_string(),
        job: FilterJobDto::filter_job(&job),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page - 1) * limit;

    let jobs = app_state
        .db_client
        .list_open_jobs(limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = JobListResponseDto {
        status: "success".to_string(),
        results: jobs.len() as i64,
        jobs: FilterJobDto::filter_jobs(&jobs),
    };
    Ok(Json(response))
}

pub async fn list_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let jobs = app_state
        .db_client
        .list_jobs_by_organizer(user.profile.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = JobListResponseDto {
        status: "success".to_string(),
        results: jobs.len() as i64,
        jobs: FilterJobDto::filter_jobs(&jobs),
    };
    Ok(Json(response))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let response = JobResponseDto {
        status: "success".to_string(),
        job: FilterJobDto::filter_job(&job),
    };
    Ok(Json(response))
}

pub async fn apply(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<ApplyDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Staff)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.status != JobStatus::Active || job.is_draft {
        return Err(HttpError::bad_request("This job is not open for applications"));
    }

    // One application per (job, applicant) pair.
    let already_applied = app_state
        .db_client
        .application_exists(job_id, user.profile.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if already_applied {
        return Err(HttpError::bad_request("You have already applied to this job"));
    }

    let application = app_state
        .db_client
        .create_application(NewApplication {
            job_id,
            applicant_id: user.profile.id,
            cover_message: body.cover_message,
            full_name: body.full_name,
            email: body.email,
            phone: body.phone,
            experience_years: body.experience_years,
            relevant_skills: body.relevant_skills,
            availability: body.availability,
        })
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ApplicationResponseDto {
        status: "success".to_string(),
        application: FilterApplicationDto::filter_application(&application),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_job_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.organizer_id != user.profile.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let applications = app_state
        .db_client
        .list_applications_for_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ApplicationListResponseDto {
        status: "success".to_string(),
        results: applications.len() as i64,
        applications: FilterApplicationDto::filter_applications(&applications),
    };
    Ok(Json(response))
}

pub async fn list_my_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Staff)?;

    let applications = app_state
        .db_client
        .list_applications_by_applicant(user.profile.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ApplicationListResponseDto {
        status: "success".to_string(),
        results: applications.len() as i64,
        applications: FilterApplicationDto::filter_applications(&applications),
    };
    Ok(Json(response))
}

/// Soft commitment check, then acceptance. Responds 402 with the
/// required/available figures when the organizer's balance cannot
/// cover this hire on top of existing commitments.
pub async fn accept_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let outcome = app_state
        .escrow_service
        .accept_application(user.profile.id, application_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(AcceptResponseDto::from_outcome(&outcome)))
}

pub async fn reject_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let application = app_state
        .db_client
        .get_application(application_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    let job = app_state
        .db_client
        .get_job(application.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.organizer_id != user.profile.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }
    if application.status != ApplicationStatus::Pending {
        return Err(HttpError::bad_request(format!(
            "Application is already {}",
            application.status.to_str()
        )));
    }

    let application = app_state
        .db_client
        .set_application_status(application_id, ApplicationStatus::Rejected)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ApplicationResponseDto {
        status: "success".to_string(),
        application: FilterApplicationDto::filter_application(&application),
    };
    Ok(Json(response))
}

pub async fn withdraw_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Staff)?;

    let application = app_state
        .db_client
        .get_application(application_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    if application.applicant_id != user.profile.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }
    if application.status != ApplicationStatus::Pending {
        return Err(HttpError::bad_request(format!(
            "Application is already {}",
            application.status.to_str()
        )));
    }

    let application = app_state
        .db_client
        .set_application_status(application_id, ApplicationStatus::Withdrawn)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ApplicationResponseDto {
        status: "success".to_string(),
        application: FilterApplicationDto::filter_application(&application),
    };
    Ok(Json(response))
}

/// Atomic release: one organizer debit, one credit per accepted hire,
/// job flipped to completed, all or nothing.
pub async fn finish_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let outcome = app_state
        .escrow_service
        .finish_job(user.profile.id, job_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(FinishResponseDto::from_outcome(&outcome)))
}

pub async fn release_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let outcome = app_state
        .escrow_service
        .release_payment(user.profile.id, application_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ReleaseResponseDto::from_outcome(&outcome)))
}

pub async fn cancel_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let job = app_state
        .escrow_service
        .cancel_job(user.profile.id, job_id)
        .await
        .map_err(HttpError::from)?;

    let response = JobResponseDto {
        status: "success".to_string(),
        job: FilterJobDto::filter_job(&job),
    };
    Ok(Json(response))
}

/// Per-job application and cost summary for the organizer.
pub async fn get_job_report(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.organizer_id != user.profile.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let counts = app_state
        .db_client
        .count_applications_by_status(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_cost = &job.pay_rate * BigDecimal::from(counts.accepted);

    let response = JobReportResponseDto {
        status: "success".to_string(),
        report: JobReportDto {
            job_title: job.title,
            event_date: job.event_date,
            location: job.location,
            total_applications: counts.total,
            accepted: counts.accepted,
            pending: counts.pending,
            rejected: counts.rejected,
            total_cost: total_cost.to_f64_or_zero(),
        },
    };
    Ok(Json(response))
}

pub async fn get_attendance_tracking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_role(&user, ProfileRole::Organizer)?;

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.organizer_id != user.profile.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let response = AttendanceResponseDto {
        status: "success".to_string(),
        attendance: AttendanceDto {
            job_id: job.id,
            job_title: job.title,
            event_date: job.event_date,
            location: job.location,
            tracking_code: attendance_code(job.id, chrono::Utc::now().date_naive()),
        },
    };
    Ok(Json(response))
}

/// Daily code staff scan on site to check in for a job.
fn attendance_code(job_id: Uuid, date: chrono::NaiveDate) -> String {
    format!("ATT-{}-{}", job_id, date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_code_embeds_job_and_day() {
        let job_id = Uuid::new_v4();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            attendance_code(job_id, date),
            format!("ATT-{}-20260830", job_id)
        );
    }
}
