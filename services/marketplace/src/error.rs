//! Custom error types for the marketplace service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repositories::RepositoryError;
use crate::validation::FieldErrors;

/// Custom error type for the marketplace service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No verified caller identity on the request
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller is not the owner of the targeted user record
    #[error("Unauthorized")]
    Unauthorized,

    /// Input failed validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Another user already holds the requested username
    #[error("Username already taken")]
    UsernameTaken,

    /// The named resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing, or owned by someone else; deliberately indistinguishable
    #[error("Unauthorized or project not found")]
    NotFoundOrUnauthorized,

    /// The identity provider supplied no usable email address
    #[error("Identity provider supplied no email address")]
    MissingEmail,

    /// Storage failure
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    /// Machine-readable error kind used in the response envelope
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "Unauthenticated",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Validation(_) => "ValidationFailed",
            ApiError::UsernameTaken => "UsernameTaken",
            ApiError::NotFound(_) => "NotFound",
            ApiError::NotFoundOrUnauthorized => "NotFoundOrUnauthorized",
            ApiError::MissingEmail => "MissingEmail",
            ApiError::Repository(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UsernameTaken => StatusCode::CONFLICT,
            ApiError::NotFound(_) | ApiError::NotFoundOrUnauthorized => StatusCode::NOT_FOUND,
            ApiError::MissingEmail => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(FieldErrors::single("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Repository(e) => {
                error!("Repository error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut envelope = json!({
            "kind": self.kind(),
            "message": message,
        });
        if let ApiError::Validation(errors) = &self {
            envelope["fieldErrors"] = json!(errors);
        }

        (status, Json(json!({ "error": envelope }))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
