// dtos/reviewdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::reviewmodel::Review,
    service::reputation_service::ReviewOutcome,
    utils::decimal::BigDecimalHelpers,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubmitReviewDto {
    pub job_id: Uuid,
    pub staff_id: Uuid,

    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f64,

    #[validate(length(max = 2000, message = "Review text must be at most 2000 characters"))]
    pub review_text: Option<String>,

    #[serde(default = "default_subscore")]
    #[validate(range(min = 1, max = 5, message = "Professionalism must be between 1 and 5"))]
    pub professionalism: i32,

    #[serde(default = "default_subscore")]
    #[validate(range(min = 1, max = 5, message = "Punctuality must be between 1 and 5"))]
    pub punctuality: i32,

    #[serde(default = "default_subscore")]
    #[validate(range(min = 1, max = 5, message = "Quality of work must be between 1 and 5"))]
    pub quality_of_work: i32,

    #[serde(default = "default_subscore")]
    #[validate(range(min = 1, max = 5, message = "Communication must be between 1 and 5"))]
    pub communication: i32,
}

fn default_subscore() -> i32 {
    5
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterReviewDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub staff_id: Uuid,
    pub organizer_id: Uuid,
    pub rating: f64,
    pub review_text: Option<String>,
    pub professionalism: i32,
    pub punctuality: i32,
    pub quality_of_work: i32,
    pub communication: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterReviewDto {
    pub fn filter_review(review: &Review) -> Self {
        FilterReviewDto {
            id: review.id,
            job_id: review.job_id,
            staff_id: review.staff_id,
            organizer_id: review.organizer_id,
            rating: review.rating.to_f64_or_zero(),
            review_text: review.review_text.clone(),
            professionalism: review.professionalism,
            punctuality: review.punctuality,
            quality_of_work: review.quality_of_work,
            communication: review.communication,
            created_at: review.created_at,
        }
    }

    pub fn filter_reviews(reviews: &[Review]) -> Vec<Self> {
        reviews.iter().map(Self::filter_review).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponseDto {
    pub status: String,
    pub review: FilterReviewDto,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub badge: String,
}

impl ReviewResponseDto {
    pub fn from_outcome(outcome: &ReviewOutcome) -> Self {
        ReviewResponseDto {
            status: "success".to_string(),
            review: FilterReviewDto::filter_review(&outcome.review),
            average_rating: outcome.average_rating.to_f64_or_zero(),
            total_reviews: outcome.total_reviews,
            badge: outcome.badge.to_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponseDto {
    pub status: String,
    pub reviews: Vec<FilterReviewDto>,
    pub results: i64,
}
