// db/jobdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{Error, Postgres, Row, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Application, ApplicationStatus, Job, JobStatus};

const JOB_COLUMNS: &str = r#"
    id, organizer_id, title, event_type, role_needed, number_of_staff, skills,
    event_date, location, pay_rate, description, requirements, status, is_draft,
    created_at, updated_at
"#;

const APPLICATION_COLUMNS: &str = r#"
    id, job_id, applicant_id, cover_message, status,
    full_name, email, phone, experience_years, relevant_skills, availability,
    created_at
"#;

pub struct NewJob {
    pub organizer_id: Uuid,
    pub title: String,
    pub event_type: Option<String>,
    pub role_needed: Option<String>,
    pub number_of_staff: i32,
    pub skills: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub pay_rate: BigDecimal,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub is_draft: bool,
}

/// Per-status application counts for an organizer's job report.
#[derive(Debug, Clone)]
pub struct ApplicationCounts {
    pub total: i64,
    pub accepted: i64,
    pub pending: i64,
    pub rejected: i64,
}

pub struct NewApplication {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_message: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<String>,
    pub relevant_skills: Option<String>,
    pub availability: Option<String>,
}

#[async_trait]
pub trait JobExt {
    async fn create_job(&self, job: NewJob) -> Result<Job, Error>;
    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;
    async fn list_open_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, Error>;
    async fn list_jobs_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn create_application(&self, application: NewApplication) -> Result<Application, Error>;
    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>, Error>;
    async fn application_exists(&self, job_id: Uuid, applicant_id: Uuid) -> Result<bool, Error>;
    async fn get_application_for_job(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<Application>, Error>;
    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, Error>;
    async fn list_applications_by_applicant(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<Application>, Error>;
    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, Error>;

    async fn count_applications_by_status(&self, job_id: Uuid)
        -> Result<ApplicationCounts, Error>;

    // Transaction-scoped operations for the escrow paths.

    /// Locks the application row so its status cannot change under a
    /// concurrent request until the caller's transaction ends.
    async fn get_application_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
    ) -> Result<Option<Application>, Error>;

    async fn get_job_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
    ) -> Result<Option<Job>, Error>;

    async fn set_job_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<(), Error>;

    async fn set_application_status_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), Error>;

    async fn list_accepted_applications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
    ) -> Result<Vec<Application>, Error>;

    /// Sum of pay rates this organizer has promised to applications
    /// already accepted on jobs that have not finished, excluding the
    /// application currently under consideration.
    async fn sum_committed_pay(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organizer_id: Uuid,
        exclude_application_id: Uuid,
    ) -> Result<BigDecimal, Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(&self, job: NewJob) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs
            (organizer_id, title, event_type, role_needed, number_of_staff, skills,
             event_date, location, pay_rate, description, requirements, is_draft)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.organizer_id)
        .bind(job.title)
        .bind(job.event_type)
        .bind(job.role_needed)
        .bind(job.number_of_staff)
        .bind(job.skills)
        .bind(job.event_date)
        .bind(job.location)
        .bind(job.pay_rate)
        .bind(job.description)
        .bind(job.requirements)
        .bind(job.is_draft)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_open_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {} FROM jobs
            WHERE status = 'active' AND is_draft = FALSE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            JOB_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_jobs_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE organizer_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application, Error> {
        sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO applications
            (job_id, applicant_id, cover_message, full_name, email, phone,
             experience_years, relevant_skills, availability)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application.job_id)
        .bind(application.applicant_id)
        .bind(application.cover_message)
        .bind(application.full_name)
        .bind(application.email)
        .bind(application.phone)
        .bind(application.experience_years)
        .bind(application.relevant_skills)
        .bind(application.availability)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn application_exists(&self, job_id: Uuid, applicant_id: Uuid) -> Result<bool, Error> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2) AS found",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<bool, _>("found"))
    }

    async fn get_application_for_job(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = $1 AND applicant_id = $2",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_applications_by_applicant(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE applicant_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $2 WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_applications_by_status(
        &self,
        job_id: Uuid,
    ) -> Result<ApplicationCounts, Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM applications
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(ApplicationCounts {
            total: row.get::<i64, _>("total"),
            accepted: row.get::<i64, _>("accepted"),
            pending: row.get::<i64, _>("pending"),
            rejected: row.get::<i64, _>("rejected"),
        })
    }

    async fn get_application_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
    ) -> Result<Option<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = $1 FOR UPDATE",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn get_job_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1 FOR UPDATE",
            JOB_COLUMNS
        ))
        .bind(job_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn set_job_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(job_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn set_application_status_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(application_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn list_accepted_applications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
    ) -> Result<Vec<Application>, Error> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = $1 AND status = 'accepted' ORDER BY created_at",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&mut **tx)
        .await
    }

    async fn sum_committed_pay(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organizer_id: Uuid,
        exclude_application_id: Uuid,
    ) -> Result<BigDecimal, Error> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(j.pay_rate), 0) AS committed
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE j.organizer_id = $1
              AND a.status = 'accepted'
              AND j.status = 'active'
              AND a.id <> $2
            "#,
        )
        .bind(organizer_id)
        .bind(exclude_application_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.get::<BigDecimal, _>("committed"))
    }
}
