// models/reviewmodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One organizer's rating of one staff member for one completed job,
/// unique per (job, staff, organizer). Saving triggers a synchronous
/// recomputation of the staff profile's aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub staff_id: Uuid,
    pub organizer_id: Uuid,

    pub rating: BigDecimal,
    pub review_text: Option<String>,

    pub professionalism: i32,
    pub punctuality: i32,
    pub quality_of_work: i32,
    pub communication: i32,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
