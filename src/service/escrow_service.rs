// service/escrow_service.rs
use std::collections::HashSet;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        jobdb::JobExt,
        ledgerdb::{LedgerExt, NewLedgerEntry},
        profiledb::ProfileExt,
    },
    models::{
        jobmodel::{Application, ApplicationStatus, Job, JobStatus},
        ledgermodel::{LedgerEntryStatus, LedgerEntryType},
    },
    service::error::ServiceError,
};

/// Figures behind an acceptance decision, surfaced to the client
/// whether the check passes or fails.
#[derive(Debug, Clone)]
pub struct CommitmentCheck {
    pub available: BigDecimal,
    pub already_committed: BigDecimal,
    pub this_hire: BigDecimal,
    pub required: BigDecimal,
}

impl CommitmentCheck {
    pub fn evaluate(
        available: BigDecimal,
        already_committed: BigDecimal,
        this_hire: BigDecimal,
    ) -> Self {
        let required = &already_committed + &this_hire;
        CommitmentCheck {
            available,
            already_committed,
            this_hire,
            required,
        }
    }

    pub fn covered(&self) -> bool {
        self.available >= self.required
    }

    fn into_error(self) -> ServiceError {
        ServiceError::InsufficientBalance {
            required: self.required,
            available: self.available,
            this_hire: self.this_hire,
            already_committed: self.already_committed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub application: Application,
    pub check: CommitmentCheck,
}

#[derive(Debug, Clone)]
pub struct FinishOutcome {
    pub job_id: Uuid,
    pub payments_released: usize,
    pub total_amount: BigDecimal,
    pub organizer_balance: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub application_id: Uuid,
    pub amount: BigDecimal,
    pub organizer_balance: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct EscrowService {
    db_client: Arc<DBClient>,
}

impl EscrowService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Accept an application after the soft commitment check: the
    /// organizer's balance must cover this hire plus everything already
    /// promised to accepted applications on unfinished jobs. No funds
    /// move here; the debit happens at job finish.
    pub async fn accept_application(
        &self,
        organizer_id: Uuid,
        application_id: Uuid,
    ) -> Result<AcceptOutcome, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        // Status checks run on rows locked inside the transaction, so
        // a withdrawal or rejection that commits first is seen here
        // and refused rather than overwritten.
        let application = self
            .db_client
            .get_application_for_update(&mut tx, application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        let job = self
            .db_client
            .get_job_for_update(&mut tx, application.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(application.job_id))?;

        ensure_acceptable(&job, &application, organizer_id)?;

        // The organizer row lock serializes concurrent acceptance
        // checks against the same balance.
        let organizer = self
            .db_client
            .get_profile_for_update(&mut tx, organizer_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(organizer_id))?;

        let committed = self
            .db_client
            .sum_committed_pay(&mut tx, organizer_id, application_id)
            .await?;

        let check = CommitmentCheck::evaluate(
            organizer.wallet_balance.clone(),
            committed,
            job.pay_rate.clone(),
        );
        if !check.covered() {
            return Err(check.into_error());
        }

        self.db_client
            .set_application_status_tx(&mut tx, application_id, ApplicationStatus::Accepted)
            .await?;

        tx.commit().await?;

        let application = self
            .db_client
            .get_application(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        Ok(AcceptOutcome { application, check })
    }

    /// Complete a job and release payment to every accepted applicant
    /// in one database transaction: one `escrow_release` debit on the
    /// organizer, one `payment` credit per staff member, then the job
    /// status flip. Partial payment is impossible; any failure rolls
    /// the whole release back.
    pub async fn finish_job(
        &self,
        organizer_id: Uuid,
        job_id: Uuid,
    ) -> Result<FinishOutcome, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let job = self
            .db_client
            .get_job_for_update(&mut tx, job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        ensure_open(&job, organizer_id)?;

        let accepted = self
            .db_client
            .list_accepted_applications(&mut tx, job_id)
            .await?;

        // Anyone already holding a completed payment entry for their
        // hire is skipped, not paid twice.
        let mut paid = HashSet::new();
        for application in &accepted {
            if self
                .db_client
                .has_completed_payment(&mut tx, application.id, application.applicant_id)
                .await?
            {
                paid.insert(application.id);
            }
        }
        let payable = payable_applications(&accepted, &paid);

        if payable.is_empty() {
            self.db_client
                .set_job_status(&mut tx, job_id, JobStatus::Completed)
                .await?;
            tx.commit().await?;
            let organizer = self
                .db_client
                .get_profile(organizer_id)
                .await?
                .ok_or(ServiceError::ProfileNotFound(organizer_id))?;
            return Ok(FinishOutcome {
                job_id,
                payments_released: 0,
                total_amount: BigDecimal::from(0),
                organizer_balance: organizer.wallet_balance,
            });
        }

        let total = release_total(&job.pay_rate, payable.len());

        let organizer = self
            .db_client
            .get_profile_for_update(&mut tx, organizer_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(organizer_id))?;

        if organizer.wallet_balance < total {
            return Err(ServiceError::InsufficientBalance {
                required: total.clone(),
                available: organizer.wallet_balance.clone(),
                this_hire: total,
                already_committed: BigDecimal::from(0),
            });
        }

        let organizer_balance = &organizer.wallet_balance - &total;
        self.db_client
            .set_wallet_balance(&mut tx, organizer_id, &organizer_balance)
            .await?;
        self.db_client
            .append_entry(
                &mut tx,
                NewLedgerEntry {
                    profile_id: organizer_id,
                    entry_type: LedgerEntryType::EscrowRelease,
                    amount: -total.clone(),
                    status: LedgerEntryStatus::Completed,
                    job_id: Some(job_id),
                    application_id: None,
                    related_profile_id: None,
                    note: Some(format!("Escrow release for job '{}'", job.title)),
                    balance_after: organizer_balance.clone(),
                },
            )
            .await?;

        for application in &payable {
            let staff = self
                .db_client
                .get_profile_for_update(&mut tx, application.applicant_id)
                .await?
                .ok_or(ServiceError::ProfileNotFound(application.applicant_id))?;

            let staff_balance = &staff.wallet_balance + &job.pay_rate;
            self.db_client
                .set_wallet_balance(&mut tx, staff.id, &staff_balance)
                .await?;
            self.db_client
                .append_entry(
                    &mut tx,
                    NewLedgerEntry {
                        profile_id: staff.id,
                        entry_type: LedgerEntryType::Payment,
                        amount: job.pay_rate.clone(),
                        status: LedgerEntryStatus::Completed,
                        job_id: Some(job_id),
                        application_id: Some(application.id),
                        related_profile_id: Some(organizer_id),
                        note: Some(format!("Payment for job '{}'", job.title)),
                        balance_after: staff_balance,
                    },
                )
                .await?;
        }

        self.db_client
            .set_job_status(&mut tx, job_id, JobStatus::Completed)
            .await?;

        tx.commit().await?;

        Ok(FinishOutcome {
            job_id,
            payments_released: payable.len(),
            total_amount: total,
            organizer_balance,
        })
    }

    /// Legacy single-application release: pays one accepted hire
    /// without completing the job. Re-release of the same application
    /// is an error here, not a silent skip.
    pub async fn release_payment(
        &self,
        organizer_id: Uuid,
        application_id: Uuid,
    ) -> Result<ReleaseOutcome, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let application = self
            .db_client
            .get_application_for_update(&mut tx, application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        if application.status != ApplicationStatus::Accepted {
            return Err(ServiceError::InvalidStatus(format!(
                "application is {}",
                application.status.to_str()
            )));
        }

        let job = self
            .db_client
            .get_job_for_update(&mut tx, application.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(application.job_id))?;

        ensure_open(&job, organizer_id)?;

        let paid = self
            .db_client
            .has_completed_payment(&mut tx, application_id, application.applicant_id)
            .await?;
        if paid {
            return Err(ServiceError::DuplicatePayment(application_id));
        }

        let organizer = self
            .db_client
            .get_profile_for_update(&mut tx, organizer_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(organizer_id))?;

        if organizer.wallet_balance < job.pay_rate {
            return Err(ServiceError::InsufficientBalance {
                required: job.pay_rate.clone(),
                available: organizer.wallet_balance.clone(),
                this_hire: job.pay_rate.clone(),
                already_committed: BigDecimal::from(0),
            });
        }

        let organizer_balance = &organizer.wallet_balance - &job.pay_rate;
        self.db_client
            .set_wallet_balance(&mut tx, organizer_id, &organizer_balance)
            .await?;
        self.db_client
            .append_entry(
                &mut tx,
                NewLedgerEntry {
                    profile_id: organizer_id,
                    entry_type: LedgerEntryType::EscrowRelease,
                    amount: -job.pay_rate.clone(),
                    status: LedgerEntryStatus::Completed,
                    job_id: Some(job.id),
                    application_id: Some(application_id),
                    related_profile_id: Some(application.applicant_id),
                    note: Some(format!("Escrow release for job '{}'", job.title)),
                    balance_after: organizer_balance.clone(),
                },
            )
            .await?;

        let staff = self
            .db_client
            .get_profile_for_update(&mut tx, application.applicant_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(application.applicant_id))?;

        let staff_balance = &staff.wallet_balance + &job.pay_rate;
        self.db_client
            .set_wallet_balance(&mut tx, staff.id, &staff_balance)
            .await?;
        self.db_client
            .append_entry(
                &mut tx,
                NewLedgerEntry {
                    profile_id: staff.id,
                    entry_type: LedgerEntryType::Payment,
                    amount: job.pay_rate.clone(),
                    status: LedgerEntryStatus::Completed,
                    job_id: Some(job.id),
                    application_id: Some(application_id),
                    related_profile_id: Some(organizer_id),
                    note: Some(format!("Payment for job '{}'", job.title)),
                    balance_after: staff_balance,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(ReleaseOutcome {
            application_id,
            amount: job.pay_rate,
            organizer_balance,
        })
    }

    /// Cancel an active job. No funds move: acceptance only soft-commits
    /// the organizer's balance, and a job stops counting toward
    /// commitments the moment it leaves `active`.
    pub async fn cancel_job(&self, organizer_id: Uuid, job_id: Uuid) -> Result<Job, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let job = self
            .db_client
            .get_job_for_update(&mut tx, job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        ensure_open(&job, organizer_id)?;
        if job.status != JobStatus::Active {
            return Err(ServiceError::InvalidStatus(format!(
                "job is {}",
                job.status.to_str()
            )));
        }

        self.db_client
            .set_job_status(&mut tx, job_id, JobStatus::Cancelled)
            .await?;

        tx.commit().await?;

        self.db_client
            .get_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }
}

/// Preconditions for flipping a pending application to accepted,
/// evaluated against the locked rows.
fn ensure_acceptable(
    job: &Job,
    application: &Application,
    organizer_id: Uuid,
) -> Result<(), ServiceError> {
    if job.organizer_id != organizer_id {
        return Err(ServiceError::UnauthorizedAccess);
    }
    if job.status != JobStatus::Active {
        return Err(ServiceError::InvalidStatus(format!(
            "job is {}",
            job.status.to_str()
        )));
    }
    if application.status != ApplicationStatus::Pending {
        return Err(ServiceError::InvalidStatus(format!(
            "application is {}",
            application.status.to_str()
        )));
    }
    Ok(())
}

/// A completed job is terminal; finish, release and cancel all refuse
/// to touch it again.
fn ensure_open(job: &Job, organizer_id: Uuid) -> Result<(), ServiceError> {
    if job.organizer_id != organizer_id {
        return Err(ServiceError::UnauthorizedAccess);
    }
    if job.status == JobStatus::Completed {
        return Err(ServiceError::AlreadyCompleted(job.id));
    }
    Ok(())
}

/// Accepted applications that have not yet received a completed
/// payment entry, in their original order.
fn payable_applications<'a>(
    accepted: &'a [Application],
    paid: &HashSet<Uuid>,
) -> Vec<&'a Application> {
    accepted
        .iter()
        .filter(|application| !paid.contains(&application.id))
        .collect()
}

/// One pay rate per accepted application; all hires on a job share the
/// job's single rate.
pub(crate) fn release_total(pay_rate: &BigDecimal, accepted_count: usize) -> BigDecimal {
    pay_rate * BigDecimal::from(accepted_count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn first_acceptance_within_balance_is_covered() {
        // Wallet 5000, nothing committed, hire at 3000.
        let check = CommitmentCheck::evaluate(dec("5000.00"), dec("0"), dec("3000.00"));
        assert!(check.covered());
        assert_eq!(check.required, dec("3000.00"));
    }

    #[test]
    fn second_acceptance_over_balance_fails() {
        // Wallet 5000, 3000 already promised, second hire at 3000.
        let check = CommitmentCheck::evaluate(dec("5000.00"), dec("3000.00"), dec("3000.00"));
        assert!(!check.covered());
        assert_eq!(check.required, dec("6000.00"));

        match check.into_error() {
            ServiceError::InsufficientBalance {
                required,
                available,
                this_hire,
                already_committed,
            } => {
                assert_eq!(required, dec("6000.00"));
                assert_eq!(available, dec("5000.00"));
                assert_eq!(this_hire, dec("3000.00"));
                assert_eq!(already_committed, dec("3000.00"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn exact_coverage_passes() {
        let check = CommitmentCheck::evaluate(dec("6000.00"), dec("3000.00"), dec("3000.00"));
        assert!(check.covered());
    }

    #[test]
    fn release_total_is_rate_times_headcount() {
        assert_eq!(release_total(&dec("1000.00"), 2), dec("2000.00"));
        assert_eq!(release_total(&dec("1000.00"), 0), dec("0"));
        assert_eq!(release_total(&dec("750.50"), 3), dec("2251.50"));
    }

    fn sample_job(organizer_id: Uuid, status: JobStatus) -> Job {
        Job {
            id: Uuid::new_v4(),
            organizer_id,
            title: "Wedding catering".to_string(),
            event_type: None,
            role_needed: None,
            number_of_staff: 2,
            skills: None,
            event_date: None,
            location: None,
            pay_rate: dec("1000.00"),
            description: None,
            requirements: None,
            status,
            is_draft: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_application(job: &Job, status: ApplicationStatus) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id: job.id,
            applicant_id: Uuid::new_v4(),
            cover_message: None,
            status,
            full_name: None,
            email: None,
            phone: None,
            experience_years: None,
            relevant_skills: None,
            availability: None,
            created_at: None,
        }
    }

    #[test]
    fn withdrawn_application_cannot_be_accepted() {
        // The status is re-checked on the locked row, so an applicant
        // who withdrew just before acceptance stays withdrawn.
        let organizer = Uuid::new_v4();
        let job = sample_job(organizer, JobStatus::Active);
        let application = sample_application(&job, ApplicationStatus::Withdrawn);

        match ensure_acceptable(&job, &application, organizer) {
            Err(ServiceError::InvalidStatus(msg)) => assert!(msg.contains("withdrawn")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn acceptance_requires_job_ownership() {
        let job = sample_job(Uuid::new_v4(), JobStatus::Active);
        let application = sample_application(&job, ApplicationStatus::Pending);

        assert!(matches!(
            ensure_acceptable(&job, &application, Uuid::new_v4()),
            Err(ServiceError::UnauthorizedAccess)
        ));
    }

    #[test]
    fn pending_application_on_active_job_is_acceptable() {
        let organizer = Uuid::new_v4();
        let job = sample_job(organizer, JobStatus::Active);
        let application = sample_application(&job, ApplicationStatus::Pending);

        assert!(ensure_acceptable(&job, &application, organizer).is_ok());
    }

    #[test]
    fn completed_job_cannot_be_finished_again() {
        // Finishing twice hits this guard before any balance or
        // ledger write, so the second call mutates nothing.
        let organizer = Uuid::new_v4();
        let job = sample_job(organizer, JobStatus::Completed);

        match ensure_open(&job, organizer) {
            Err(ServiceError::AlreadyCompleted(id)) => assert_eq!(id, job.id),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn already_paid_hires_are_skipped_at_finish() {
        let organizer = Uuid::new_v4();
        let job = sample_job(organizer, JobStatus::Active);
        let accepted = vec![
            sample_application(&job, ApplicationStatus::Accepted),
            sample_application(&job, ApplicationStatus::Accepted),
            sample_application(&job, ApplicationStatus::Accepted),
        ];

        let mut paid = HashSet::new();
        paid.insert(accepted[1].id);

        let payable = payable_applications(&accepted, &paid);
        assert_eq!(payable.len(), 2);
        assert_eq!(payable[0].id, accepted[0].id);
        assert_eq!(payable[1].id, accepted[2].id);

        assert_eq!(
            release_total(&job.pay_rate, payable.len()),
            dec("2000.00")
        );
    }
}
