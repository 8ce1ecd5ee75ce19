/// HTTP error mapping
///
/// Handlers return `ApiResult<T>`; every failure becomes a JSON body of the
/// form:
///
/// ```json
/// { "error": "duplicate_quote", "message": "You already quoted this project", "retryable": false }
/// ```
///
/// `error` is a stable code per failure kind, so callers never need to parse
/// `message`. Validation failures add a `details` array of `{field, message}`
/// objects. Internal errors are logged and replaced with a generic message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use obras_shared::error::{FieldError, MarketError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path parameter (400)
    BadRequest(String),

    /// Malformed request body (422)
    ValidationError(Vec<FieldError>),

    /// Failure reported by a marketplace operation
    Market(MarketError),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "duplicate_quote", "missing_token")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Whether repeating the same request may succeed
    pub retryable: bool,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Market(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

/// HTTP status for each marketplace failure kind
fn market_status(err: &MarketError) -> StatusCode {
    match err {
        MarketError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MarketError::DuplicateEmail
        | MarketError::DuplicateQuote
        | MarketError::DuplicateReview
        | MarketError::Conflict(_) => StatusCode::CONFLICT,
        MarketError::InvalidCredentials
        | MarketError::MissingToken
        | MarketError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
        MarketError::NotFound(_) => StatusCode::NOT_FOUND,
        MarketError::InvalidState(_) => StatusCode::BAD_REQUEST,
        MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "bad_request".to_string(),
                    message,
                    retryable: false,
                    details: None,
                },
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "validation_error".to_string(),
                    message: "Request validation failed".to_string(),
                    retryable: false,
                    details: Some(errors),
                },
            ),
            ApiError::Market(err) => {
                let status = market_status(&err);
                let error = err.code().to_string();
                let retryable = err.is_retryable();

                let (message, details) = match err {
                    MarketError::Validation(details) => {
                        ("Request validation failed".to_string(), Some(details))
                    }
                    MarketError::Internal(msg) => {
                        // Detail stays in the logs
                        tracing::error!("Internal error: {}", msg);
                        ("An internal error occurred".to_string(), None)
                    }
                    MarketError::InvalidToken(msg)
                    | MarketError::Forbidden(msg)
                    | MarketError::InvalidState(msg)
                    | MarketError::Conflict(msg) => (msg, None),
                    other => (other.to_string(), None),
                };

                (
                    status,
                    ErrorResponse {
                        error,
                        message,
                        retryable,
                        details,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError::Market(err)
    }
}

/// Malformed JSON bodies are reported like any other validation failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::from(MarketError::NotFound("Project"));
        assert_eq!(err.to_string(), "Project not found");
    }

    #[tokio::test]
    async fn test_market_error_status_mapping() {
        let cases = [
            (MarketError::validation("rating", "bad"), StatusCode::UNPROCESSABLE_ENTITY, "validation_error", false),
            (MarketError::DuplicateEmail, StatusCode::CONFLICT, "duplicate_email", false),
            (MarketError::DuplicateQuote, StatusCode::CONFLICT, "duplicate_quote", false),
            (MarketError::DuplicateReview, StatusCode::CONFLICT, "duplicate_review", false),
            (MarketError::Conflict("lost".to_string()), StatusCode::CONFLICT, "conflict", true),
            (MarketError::InvalidCredentials, StatusCode::UNAUTHORIZED, "invalid_credentials", false),
            (MarketError::MissingToken, StatusCode::UNAUTHORIZED, "missing_token", false),
            (MarketError::InvalidToken("bad".to_string()), StatusCode::UNAUTHORIZED, "invalid_token", false),
            (MarketError::Forbidden("no".to_string()), StatusCode::FORBIDDEN, "forbidden", false),
            (MarketError::NotFound("Quote"), StatusCode::NOT_FOUND, "not_found", false),
            (MarketError::InvalidState("open".to_string()), StatusCode::BAD_REQUEST, "invalid_state", false),
            (MarketError::Internal("db down".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "internal_error", true),
        ];

        for (err, status, code, retryable) in cases {
            let (actual_status, body) = body_of(ApiError::from(err)).await;
            assert_eq!(actual_status, status, "status for {}", code);
            assert_eq!(body.error, code);
            assert_eq!(body.retryable, retryable, "retryable for {}", code);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_masked() {
        let (_, body) = body_of(ApiError::from(MarketError::Internal(
            "connection refused at 10.0.0.5".to_string(),
        )))
        .await;

        assert_eq!(body.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn test_validation_error_details() {
        let err = ApiError::ValidationError(vec![
            FieldError::new("email", "Invalid email format"),
            FieldError::new("password", "Password too short"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "validation_error");
        assert_eq!(body.details.unwrap().len(), 2);
    }
}
