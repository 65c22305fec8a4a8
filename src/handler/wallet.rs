// handler/wallet.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::walletdtos::*,
    error::HttpError,
    middleware::main_middleware::JWTAuthMiddeware,
    service::error::ServiceError,
    utils::decimal::{money_from_f64, BigDecimalHelpers},
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new()
        .route("/", get(get_wallet))
        .route("/stats", get(get_wallet_stats))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
}

/// Balance plus the most recent ledger slice, newest first.
pub async fn get_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let entries = app_state
        .wallet_service
        .ledger(user.profile.id)
        .await
        .map_err(HttpError::from)?;

    let response = LedgerResponseDto {
        status: "success".to_string(),
        balance: user.profile.wallet_balance.to_f64_or_zero(),
        results: entries.len() as i64,
        entries: LedgerEntryDto::filter_entries(&entries),
    };
    Ok(Json(response))
}

/// Rolled-up ledger figures plus a monthly earnings series for the
/// wallet dashboard.
pub async fn get_wallet_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .wallet_service
        .stats(user.profile.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(WalletStatsResponseDto::from_stats(&stats)))
}

pub async fn deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<DepositRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let amount = money_from_f64(body.amount)
        .ok_or_else(|| HttpError::from(ServiceError::InvalidAmount))?;

    let mutation = app_state
        .wallet_service
        .deposit(user.profile.id, amount)
        .await
        .map_err(HttpError::from)?;

    let response = WalletMutationResponseDto {
        status: "success".to_string(),
        balance: mutation.balance.to_f64_or_zero(),
        entry: LedgerEntryDto::filter_entry(&mutation.entry),
    };
    Ok(Json(response))
}

pub async fn withdraw(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<WithdrawRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let amount = money_from_f64(body.amount)
        .ok_or_else(|| HttpError::from(ServiceError::InvalidAmount))?;

    let mutation = app_state
        .wallet_service
        .withdraw(user.profile.id, amount)
        .await
        .map_err(HttpError::from)?;

    let response = WalletMutationResponseDto {
        status: "success".to_string(),
        balance: mutation.balance.to_f64_or_zero(),
        entry: LedgerEntryDto::filter_entry(&mutation.entry),
    };
    Ok(Json(response))
}
