use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Subscription period must be between 1 and 12 months, got {0}")]
    InvalidPeriod(i32),

    #[error("You already have an active subscription to this publication")]
    DuplicateActiveSubscription,

    #[error("Subscription is already cancelled or finished")]
    AlreadyInactive,

    #[error("Subscription end date must be after its start date")]
    InvalidDateRange,

    #[error("{}: {}", batch_summary(*created), messages.join("; "))]
    SubscriptionBatch {
        created: usize,
        messages: Vec<String>,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

fn batch_summary(created: usize) -> &'static str {
    if created > 0 {
        "Some subscriptions were not created"
    } else {
        "Failed to create subscriptions"
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidPeriod(_) => "INVALID_PERIOD",
            AppError::DuplicateActiveSubscription => "DUPLICATE_ACTIVE_SUBSCRIPTION",
            AppError::AlreadyInactive => "ALREADY_INACTIVE",
            AppError::InvalidDateRange => "INVALID_DATE_RANGE",
            AppError::SubscriptionBatch { .. } => "SUBSCRIPTION_BATCH_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ConfigError(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to clients; server-side failures stay opaque.
    pub(crate) fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::JwtError(_) => "Invalid access token".to_string(),
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPeriod(_)
            | AppError::InvalidDateRange
            | AppError::SubscriptionBatch { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::DuplicateActiveSubscription
            | AppError::AlreadyInactive => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }

        let mut error = json!({
            "code": self.code(),
            "message": self.public_message(),
        });
        if let AppError::SubscriptionBatch { messages, .. } = self {
            error["details"] = json!(messages);
        }

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": error
        }))
    }
}
