//! Error taxonomy shared by the store and the REST controllers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A topic, file, note, task or other addressed row does not exist
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidOperation(String),
    /// Missing or malformed request field
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(value: r2d2::Error) -> Self {
        Self::Storage(format!("connection pool: {}", value))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(format!("stored content is not valid JSON: {}", value))
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(value: actix_web::error::BlockingError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidOperation(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(e) = self {
            log::error!("Storage failure: {}", e);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("Topic").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::invalid("nope").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("missing field `name`".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(rusqlite::Error::QueryReturnedNoRows).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_the_resource() {
        assert_eq!(ApiError::not_found("Green note").to_string(), "Green note not found");
    }
}
