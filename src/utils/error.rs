use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Validation(String),
    Unauthorized(String),
    Conflict(String),
    NotFound(String),
    DatabaseError(String),
    ProviderError(String),
    Internal(String),
}

impl AppError {
    /// HTTP status used when the error crosses the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message without the category prefix, safe to hand back to clients
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::DatabaseError(msg)
            | AppError::ProviderError(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::ProviderError(format!("request timed out: {}", e))
        } else {
            AppError::ProviderError(e.to_string())
        }
    }
}
