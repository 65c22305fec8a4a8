// handler/reviews.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::reviewdtos::*,
    error::{ErrorMessage, HttpError},
    middleware::main_middleware::JWTAuthMiddeware,
    models::profilemodel::ProfileRole,
    service::reputation_service::ReviewInput,
    utils::decimal::money_from_f64,
    AppState,
};

const REVIEW_PAGE_SIZE: i64 = 50;

pub fn reviews_handler() -> Router {
    Router::new()
        .route("/", post(submit_review))
        .route("/staff/:staff_id", get(list_staff_reviews))
}

pub async fn submit_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<SubmitReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    if user.profile.role != ProfileRole::Organizer {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let rating = money_from_f64(body.rating)
        .ok_or_else(|| HttpError::bad_request("Rating must be a number"))?;

    let outcome = app_state
        .reputation_service
        .submit_review(
            user.profile.id,
            ReviewInput {
                job_id: body.job_id,
                staff_id: body.staff_id,
                rating,
                review_text: body.review_text,
                professionalism: body.professionalism,
                punctuality: body.punctuality,
                quality_of_work: body.quality_of_work,
                communication: body.communication,
            },
        )
        .await
        .map_err(HttpError::from)?;

    // A resubmission overwrites the earlier review, so it answers 200
    // rather than 201.
    let code = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(ReviewResponseDto::from_outcome(&outcome))))
}

pub async fn list_staff_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(staff_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .reputation_service
        .reviews_for_staff(staff_id, REVIEW_PAGE_SIZE)
        .await
        .map_err(HttpError::from)?;

    let response = ReviewListResponseDto {
        status: "success".to_string(),
        results: reviews.len() as i64,
        reviews: FilterReviewDto::filter_reviews(&reviews),
    };
    Ok(Json(response))
}
