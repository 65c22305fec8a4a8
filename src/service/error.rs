// service/error.rs
use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Amount must be a positive value with at most two decimal places")]
    InvalidAmount,

    #[error("Insufficient balance: required {required}, available {available} (this hire {this_hire}, already committed {already_committed})")]
    InsufficientBalance {
        required: BigDecimal,
        available: BigDecimal,
        this_hire: BigDecimal,
        already_committed: BigDecimal,
    },

    #[error("Bank details must be on file before withdrawing")]
    MissingBankDetails,

    #[error("Job {0} has already been completed")]
    AlreadyCompleted(Uuid),

    #[error("Payment for application {0} has already been released")]
    DuplicatePayment(Uuid),

    #[error("Profile {0} not found")]
    ProfileNotFound(Uuid),

    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Application {0} not found")]
    ApplicationNotFound(Uuid),

    #[error("Not authorized to act on this resource")]
    UnauthorizedAccess,

    #[error("Invalid status for this operation: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::ProfileNotFound(_)
            | ServiceError::JobNotFound(_)
            | ServiceError::ApplicationNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::InvalidAmount
            | ServiceError::MissingBankDetails
            | ServiceError::AlreadyCompleted(_)
            | ServiceError::DuplicatePayment(_)
            | ServiceError::InvalidStatus(_)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::UnauthorizedAccess => HttpError::forbidden(error.to_string()),

            ServiceError::InsufficientBalance { .. } => {
                HttpError::payment_required(error.to_string())
            }

            ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}
