// dtos/jobdtos.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::jobmodel::{Application, Job},
    service::escrow_service::{AcceptOutcome, FinishOutcome, ReleaseOutcome},
    utils::decimal::BigDecimalHelpers,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    pub event_type: Option<String>,
    pub role_needed: Option<String>,

    #[validate(range(min = 1, max = 500, message = "Number of staff must be between 1 and 500"))]
    pub number_of_staff: i32,

    pub skills: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,

    #[validate(range(min = 0.01, message = "Pay rate must be positive"))]
    pub pay_rate: f64,

    pub description: Option<String>,
    pub requirements: Option<String>,

    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ApplyDto {
    #[validate(length(max = 2000, message = "Cover message must be at most 2000 characters"))]
    pub cover_message: Option<String>,

    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<String>,
    pub relevant_skills: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterJobDto {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub event_type: Option<String>,
    pub role_needed: Option<String>,
    pub number_of_staff: i32,
    pub skills: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub pay_rate: f64,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub status: String,
    pub is_draft: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterJobDto {
    pub fn filter_job(job: &Job) -> Self {
        FilterJobDto {
            id: job.id,
            organizer_id: job.organizer_id,
            title: job.title.to_owned(),
            event_type: job.event_type.clone(),
            role_needed: job.role_needed.clone(),
            number_of_staff: job.number_of_staff,
            skills: job.skills.clone(),
            event_date: job.event_date,
            location: job.location.clone(),
            pay_rate: job.pay_rate.to_f64_or_zero(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            status: job.status.to_str().to_string(),
            is_draft: job.is_draft,
            created_at: job.created_at,
        }
    }

    pub fn filter_jobs(jobs: &[Job]) -> Vec<Self> {
        jobs.iter().map(Self::filter_job).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterApplicationDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_message: Option<String>,
    pub status: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<String>,
    pub relevant_skills: Option<String>,
    pub availability: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterApplicationDto {
    pub fn filter_application(application: &Application) -> Self {
        FilterApplicationDto {
            id: application.id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            cover_message: application.cover_message.clone(),
            status: application.status.to_str().to_string(),
            full_name: application.full_name.clone(),
            email: application.email.clone(),
            phone: application.phone.clone(),
            experience_years: application.experience_years.clone(),
            relevant_skills: application.relevant_skills.clone(),
            availability: application.availability.clone(),
            created_at: application.created_at,
        }
    }

    pub fn filter_applications(applications: &[Application]) -> Vec<Self> {
        applications.iter().map(Self::filter_application).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponseDto {
    pub status: String,
    pub job: FilterJobDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponseDto {
    pub status: String,
    pub jobs: Vec<FilterJobDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationResponseDto {
    pub status: String,
    pub application: FilterApplicationDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationListResponseDto {
    pub status: String,
    pub applications: Vec<FilterApplicationDto>,
    pub results: i64,
}

/// Echoes the commitment figures so the client can show how much of
/// the wallet is promised elsewhere.
#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptResponseDto {
    pub status: String,
    pub application: FilterApplicationDto,
    pub required: f64,
    pub available: f64,
    pub this_hire: f64,
    pub already_committed: f64,
}

impl AcceptResponseDto {
    pub fn from_outcome(outcome: &AcceptOutcome) -> Self {
        AcceptResponseDto {
            status: "success".to_string(),
            application: FilterApplicationDto::filter_application(&outcome.application),
            required: outcome.check.required.to_f64_or_zero(),
            available: outcome.check.available.to_f64_or_zero(),
            this_hire: outcome.check.this_hire.to_f64_or_zero(),
            already_committed: outcome.check.already_committed.to_f64_or_zero(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinishResponseDto {
    pub status: String,
    pub job_id: Uuid,
    pub payments_released: usize,
    pub total_amount: f64,
    pub organizer_balance: f64,
}

impl FinishResponseDto {
    pub fn from_outcome(outcome: &FinishOutcome) -> Self {
        FinishResponseDto {
            status: "success".to_string(),
            job_id: outcome.job_id,
            payments_released: outcome.payments_released,
            total_amount: outcome.total_amount.to_f64_or_zero(),
            organizer_balance: outcome.organizer_balance.to_f64_or_zero(),
        }
    }
}

/// Application and cost summary an organizer can pull per job.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobReportDto {
    pub job_title: String,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub total_applications: i64,
    pub accepted: i64,
    pub pending: i64,
    pub rejected: i64,
    pub total_cost: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobReportResponseDto {
    pub status: String,
    pub report: JobReportDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceDto {
    pub job_id: Uuid,
    pub job_title: String,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub tracking_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceResponseDto {
    pub status: String,
    pub attendance: AttendanceDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReleaseResponseDto {
    pub status: String,
    pub application_id: Uuid,
    pub amount: f64,
    pub organizer_balance: f64,
}

impl ReleaseResponseDto {
    pub fn from_outcome(outcome: &ReleaseOutcome) -> Self {
        ReleaseResponseDto {
            status: "success".to_string(),
            application_id: outcome.application_id,
            amount: outcome.amount.to_f64_or_zero(),
            organizer_balance: outcome.organizer_balance.to_f64_or_zero(),
        }
    }
}
