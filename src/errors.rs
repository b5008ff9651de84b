use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Failure of a single user action. Every variant is terminal for the
/// action that raised it; nothing is retried.
#[derive(Debug, Display)]
pub enum AppError {
    /// Missing required field on add/edit. Nothing is written.
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Malformed upload (bad extension, undecodable workbook).
    #[display(fmt = "{}", _0)]
    Parse(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// Anything the store reports: connectivity, constraint violations, ...
    #[display(fmt = "store error: {}", _0)]
    Store(sqlx::Error),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Store(e)
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        AppError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Store(e) => {
                error!(error = %e, "Store operation failed");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

pub type AppResult<T> = Result<T, AppError>;
