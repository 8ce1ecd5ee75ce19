/// Domain error taxonomy
///
/// Every marketplace operation returns `MarketResult<T>`. The variants are the
/// externally visible failure kinds; storage and crypto failures that don't
/// map onto one of them collapse into `Internal`, whose detail is for logs only.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;

/// Per-field validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Marketplace error kinds
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Malformed or out-of-range input
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// Registration with an email that is already taken
    #[error("Email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No bearer token presented
    #[error("Token is missing")]
    MissingToken,

    /// Token malformed, expired, wrongly signed, or its user is gone
    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Authenticated but not allowed to perform this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Action not valid in the project's current lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Provider already quoted this project
    #[error("You already quoted this project")]
    DuplicateQuote,

    /// Reviewer already reviewed this counterpart for this project
    #[error("You already reviewed this project")]
    DuplicateReview,

    /// Lost a race against a concurrent mutation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure (storage unavailable, hashing failure, ...)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Single-field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MarketError::Validation(vec![FieldError::new(field, message)])
    }

    /// Stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Validation(_) => "validation_error",
            MarketError::DuplicateEmail => "duplicate_email",
            MarketError::InvalidCredentials => "invalid_credentials",
            MarketError::MissingToken => "missing_token",
            MarketError::InvalidToken(_) => "invalid_token",
            MarketError::NotFound(_) => "not_found",
            MarketError::Forbidden(_) => "forbidden",
            MarketError::InvalidState(_) => "invalid_state",
            MarketError::DuplicateQuote => "duplicate_quote",
            MarketError::DuplicateReview => "duplicate_review",
            MarketError::Conflict(_) => "conflict",
            MarketError::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller may safely retry the same request
    ///
    /// Only a lost race or a transient failure qualifies; duplicates are
    /// permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MarketError::Conflict(_) | MarketError::Internal(_))
    }
}

impl From<ValidationErrors> for MarketError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                let field = if *field == "__all__" {
                    "request".to_string()
                } else {
                    field.to_string()
                };
                errors.iter().map(move |error| {
                    FieldError::new(
                        field.clone(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    )
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        MarketError::Validation(details)
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => MarketError::NotFound(entity),
            StoreError::Duplicate(constraint) => {
                MarketError::Conflict(format!("Constraint violation: {}", constraint))
            }
            StoreError::NotOpen => {
                MarketError::Conflict("Project already has an accepted quote".to_string())
            }
            StoreError::Database(e) => MarketError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<PasswordError> for MarketError {
    fn from(err: PasswordError) -> Self {
        MarketError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for MarketError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => MarketError::Internal(msg),
            JwtError::Expired => MarketError::InvalidToken("Token expired".to_string()),
            other => MarketError::InvalidToken(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_error_display() {
        assert_eq!(MarketError::NotFound("Project").to_string(), "Project not found");
        assert_eq!(
            MarketError::validation("rating", "out of range").to_string(),
            "Validation failed: 1 errors"
        );
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("length");
        error.message = Some("Name is required".into());
        errors.add("name", error);
        errors.add("email", ValidationError::new("email"));

        match MarketError::from(errors) {
            MarketError::Validation(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0], FieldError::new("email", "Validation failed"));
                assert_eq!(details[1], FieldError::new("name", "Name is required"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            MarketError::from(StoreError::NotFound("Quote")),
            MarketError::NotFound("Quote")
        ));
        assert!(matches!(
            MarketError::from(StoreError::NotOpen),
            MarketError::Conflict(_)
        ));
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(
            MarketError::from(JwtError::Expired),
            MarketError::InvalidToken(_)
        ));
        assert!(matches!(
            MarketError::from(JwtError::CreateError("boom".to_string())),
            MarketError::Internal(_)
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(MarketError::Conflict("lost".to_string()).is_retryable());
        assert!(!MarketError::Forbidden("no".to_string()).is_retryable());
        assert!(!MarketError::DuplicateQuote.is_retryable());
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            MarketError::validation("rating", "bad"),
            MarketError::DuplicateEmail,
            MarketError::InvalidCredentials,
            MarketError::MissingToken,
            MarketError::InvalidToken("bad".to_string()),
            MarketError::NotFound("Quote"),
            MarketError::Forbidden("no".to_string()),
            MarketError::InvalidState("open".to_string()),
            MarketError::DuplicateQuote,
            MarketError::DuplicateReview,
            MarketError::Conflict("lost".to_string()),
            MarketError::Internal("db down".to_string()),
        ];

        let mut codes: Vec<&str> = errors.iter().map(MarketError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
