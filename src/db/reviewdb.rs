// db/reviewdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{Error, Postgres, Row, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::Review;

const REVIEW_COLUMNS: &str = r#"
    id, job_id, staff_id, organizer_id, rating, review_text,
    professionalism, punctuality, quality_of_work, communication,
    created_at, updated_at
"#;

pub struct NewReview {
    pub job_id: Uuid,
    pub staff_id: Uuid,
    pub organizer_id: Uuid,
    pub rating: BigDecimal,
    pub review_text: Option<String>,
    pub professionalism: i32,
    pub punctuality: i32,
    pub quality_of_work: i32,
    pub communication: i32,
}

#[async_trait]
pub trait ReviewExt {
    /// Insert-or-replace on (job, staff, organizer). A re-submitted
    /// review overwrites the earlier one rather than adding a second
    /// row, which keeps the aggregates honest.
    async fn upsert_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: NewReview,
    ) -> Result<Review, Error>;

    async fn find_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        staff_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Review>, Error>;

    /// (average rating, review count) across all of the staff member's
    /// reviews, computed inside the caller's transaction so the
    /// profile update sees a consistent snapshot.
    async fn aggregate_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff_id: Uuid,
    ) -> Result<(BigDecimal, i64), Error>;

    /// Whether any review already exists for this (job, staff) pair,
    /// regardless of reviewer. Decides the events-completed increment.
    async fn review_exists_for_job_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        staff_id: Uuid,
    ) -> Result<bool, Error>;

    async fn list_reviews_for_staff(
        &self,
        staff_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Review>, Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn upsert_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: NewReview,
    ) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews
            (job_id, staff_id, organizer_id, rating, review_text,
             professionalism, punctuality, quality_of_work, communication)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (job_id, staff_id, organizer_id)
            DO UPDATE SET
                rating = EXCLUDED.rating,
                review_text = EXCLUDED.review_text,
                professionalism = EXCLUDED.professionalism,
                punctuality = EXCLUDED.punctuality,
                quality_of_work = EXCLUDED.quality_of_work,
                communication = EXCLUDED.communication,
                updated_at = NOW()
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(review.job_id)
        .bind(review.staff_id)
        .bind(review.organizer_id)
        .bind(review.rating)
        .bind(review.review_text)
        .bind(review.professionalism)
        .bind(review.punctuality)
        .bind(review.quality_of_work)
        .bind(review.communication)
        .fetch_one(&mut **tx)
        .await
    }

    async fn find_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        staff_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE job_id = $1 AND staff_id = $2 AND organizer_id = $3",
            REVIEW_COLUMNS
        ))
        .bind(job_id)
        .bind(staff_id)
        .bind(organizer_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn aggregate_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff_id: Uuid,
    ) -> Result<(BigDecimal, i64), Error> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(AVG(rating), 0) AS average, COUNT(*) AS total
            FROM reviews
            WHERE staff_id = $1
            "#,
        )
        .bind(staff_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok((row.get::<BigDecimal, _>("average"), row.get::<i64, _>("total")))
    }

    async fn review_exists_for_job_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        staff_id: Uuid,
    ) -> Result<bool, Error> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE job_id = $1 AND staff_id = $2) AS found",
        )
        .bind(job_id)
        .bind(staff_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.get::<bool, _>("found"))
    }

    async fn list_reviews_for_staff(
        &self,
        staff_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE staff_id = $1 ORDER BY created_at DESC LIMIT $2",
            REVIEW_COLUMNS
        ))
        .bind(staff_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
