// handler/profiles.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::profiledb::ProfileExt,
    dtos::{profiledtos::*, userdtos::RequestQueryDto},
    error::HttpError,
    middleware::main_middleware::JWTAuthMiddeware,
    AppState,
};

pub fn profiles_handler() -> Router {
    Router::new()
        .route("/me", get(get_my_profile).put(update_my_profile))
        .route("/me/bank-details", put(update_bank_details))
        .route("/staff", get(list_staff))
        .route("/:profile_id", get(get_profile))
}

pub async fn get_my_profile(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let response = ProfileResponseDto {
        status: "success".to_string(),
        profile: FilterProfileDto::filter_profile(&user.profile),
    };
    Ok(Json(response))
}

pub async fn update_my_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .update_contact_details(user.profile.id, body.city, body.phone, body.bio)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ProfileResponseDto {
        status: "success".to_string(),
        profile: FilterProfileDto::filter_profile(&profile),
    };
    Ok(Json(response))
}

pub async fn update_bank_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateBankDetailsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .update_bank_details(
            user.profile.id,
            body.account_holder,
            body.account_number,
            body.ifsc_code,
            body.bank_name,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ProfileResponseDto {
        status: "success".to_string(),
        profile: FilterProfileDto::filter_profile(&profile),
    };
    Ok(Json(response))
}

pub async fn list_staff(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page - 1) * limit;

    let profiles = app_state
        .db_client
        .list_staff_profiles(limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ProfileListResponseDto {
        status: "success".to_string(),
        results: profiles.len() as i64,
        profiles: FilterProfileDto::filter_profiles(&profiles),
    };
    Ok(Json(response))
}

pub async fn get_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_profile(profile_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Profile not found"))?;

    let response = ProfileResponseDto {
        status: "success".to_string(),
        profile: FilterProfileDto::filter_profile(&profile),
    };
    Ok(Json(response))
}
