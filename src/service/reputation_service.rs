// service/reputation_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        jobdb::JobExt,
        profiledb::ProfileExt,
        reviewdb::{NewReview, ReviewExt},
    },
    models::{
        jobmodel::{ApplicationStatus, JobStatus},
        profilemodel::{badge_for, BadgeLevel, ProfileRole},
        reviewmodel::Review,
    },
    service::error::ServiceError,
    utils::decimal::to_money,
};

pub struct ReviewInput {
    pub job_id: Uuid,
    pub staff_id: Uuid,
    pub rating: BigDecimal,
    pub review_text: Option<String>,
    pub professionalism: i32,
    pub punctuality: i32,
    pub quality_of_work: i32,
    pub communication: i32,
}

#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review: Review,
    /// False when this organizer re-submitted and overwrote an
    /// earlier review for the same job and staff member.
    pub created: bool,
    pub average_rating: BigDecimal,
    pub total_reviews: i64,
    pub badge: BadgeLevel,
}

/// Profile-side effects of saving one review, derived from the
/// post-save aggregates. A review that lands on an already-reviewed
/// (job, staff) pair moves the averages but never re-counts the event.
#[derive(Debug, Clone)]
pub struct ReputationUpdate {
    pub average: BigDecimal,
    pub badge: BadgeLevel,
    pub events_delta: i32,
}

impl ReputationUpdate {
    pub fn compute(raw_average: BigDecimal, total_reviews: i64, already_reviewed: bool) -> Self {
        let average = to_money(raw_average);
        let badge = badge_for(&average, total_reviews as i32);
        ReputationUpdate {
            average,
            badge,
            events_delta: if already_reviewed { 0 } else { 1 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReputationService {
    db_client: Arc<DBClient>,
}

impl ReputationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Create or overwrite the organizer's review of a staff member
    /// for a completed job, then recompute the staff profile's rating
    /// aggregates and badge in the same transaction. The first review
    /// for a (job, staff) pair also counts the event as completed.
    pub async fn submit_review(
        &self,
        organizer_id: Uuid,
        input: ReviewInput,
    ) -> Result<ReviewOutcome, ServiceError> {
        let rating = to_money(input.rating);
        if rating < BigDecimal::from(1) || rating > BigDecimal::from(5) {
            return Err(ServiceError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let job = self
            .db_client
            .get_job(input.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(input.job_id))?;

        if job.organizer_id != organizer_id {
            return Err(ServiceError::UnauthorizedAccess);
        }
        if job.status != JobStatus::Completed {
            return Err(ServiceError::InvalidStatus(
                "job must be completed before it can be reviewed".to_string(),
            ));
        }

        let staff = self
            .db_client
            .get_profile(input.staff_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(input.staff_id))?;
        if staff.role != ProfileRole::Staff {
            return Err(ServiceError::Validation(
                "Reviews can only be left for staff profiles".to_string(),
            ));
        }

        // Only staff who were actually hired for this job can be reviewed.
        let application = self
            .db_client
            .get_application_for_job(input.job_id, input.staff_id)
            .await?;
        match application {
            Some(a) if a.status == ApplicationStatus::Accepted => {}
            _ => {
                return Err(ServiceError::InvalidStatus(
                    "staff member was not hired for this job".to_string(),
                ))
            }
        }

        let mut tx = self.db_client.pool.begin().await?;

        let already_reviewed = self
            .db_client
            .review_exists_for_job_staff(&mut tx, input.job_id, input.staff_id)
            .await?;

        // Distinguishes a fresh review from an overwrite of this
        // organizer's earlier one, for the 201/200 split at the edge.
        let created = self
            .db_client
            .find_review(&mut tx, input.job_id, input.staff_id, organizer_id)
            .await?
            .is_none();

        let review = self
            .db_client
            .upsert_review(
                &mut tx,
                NewReview {
                    job_id: input.job_id,
                    staff_id: input.staff_id,
                    organizer_id,
                    rating,
                    review_text: input.review_text,
                    professionalism: input.professionalism,
                    punctuality: input.punctuality,
                    quality_of_work: input.quality_of_work,
                    communication: input.communication,
                },
            )
            .await?;

        let (average, total) = self
            .db_client
            .aggregate_rating(&mut tx, input.staff_id)
            .await?;
        let update = ReputationUpdate::compute(average, total, already_reviewed);

        self.db_client
            .apply_reputation(
                &mut tx,
                input.staff_id,
                &update.average,
                total as i32,
                update.badge,
                update.events_delta,
            )
            .await?;

        tx.commit().await?;

        Ok(ReviewOutcome {
            review,
            created,
            average_rating: update.average,
            total_reviews: total,
            badge: update.badge,
        })
    }

    pub async fn reviews_for_staff(
        &self,
        staff_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Review>, ServiceError> {
        let reviews = self
            .db_client
            .list_reviews_for_staff(staff_id, limit)
            .await?;
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn first_review_counts_the_event() {
        let update = ReputationUpdate::compute(dec("4.5"), 1, false);
        assert_eq!(update.events_delta, 1);
        assert_eq!(update.average, dec("4.50"));
        assert_eq!(update.badge, BadgeLevel::Elite);
    }

    #[test]
    fn resubmission_updates_in_place_without_recounting() {
        // The same (job, staff) pair reviewed again: the aggregates
        // move with the overwritten rating, the completed-events
        // counter stays where it was.
        let update = ReputationUpdate::compute(dec("3.2"), 1, true);
        assert_eq!(update.events_delta, 0);
        assert_eq!(update.average, dec("3.20"));
        assert_eq!(update.badge, BadgeLevel::Pro);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let update = ReputationUpdate::compute(dec("4.666666"), 3, true);
        assert_eq!(update.average, dec("4.67"));
        assert_eq!(update.badge, BadgeLevel::Elite);
    }
}
