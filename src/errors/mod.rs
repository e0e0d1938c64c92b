use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::ApiMessage;

/// Message returned for request bodies that cannot be parsed
pub const WRONG_API_USAGE: &str = "Wrong API usage.";

/// Error kinds surfaced by the page content service
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WikiError {
    /// HTTP status for this error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            WikiError::NotFound(_) => StatusCode::NOT_FOUND,
            WikiError::Unauthorized => StatusCode::UNAUTHORIZED,
            WikiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WikiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            WikiError::Internal(_) | WikiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn wrong_api_usage() -> Self {
        WikiError::BadRequest(WRONG_API_USAGE.to_string())
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ApiMessage::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WikiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(WikiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WikiError::wrong_api_usage().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            WikiError::MethodNotAllowed("x".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            WikiError::Internal("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_passed_through() {
        assert_eq!(WikiError::NotFound("Not found".into()).to_string(), "Not found");
        assert_eq!(WikiError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(WikiError::wrong_api_usage().to_string(), WRONG_API_USAGE);
    }
}
