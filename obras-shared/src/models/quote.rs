/// Quote model
///
/// A quote is a provider's priced bid on a project. Each provider may quote a
/// given project at most once, and at most one quote per project is ever
/// accepted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE quotes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     price DOUBLE PRECISION NOT NULL CHECK (price > 0),
///     description TEXT NOT NULL,
///     estimated_duration VARCHAR(100),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     provider_id UUID NOT NULL REFERENCES users(id),
///     is_accepted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (project_id, provider_id)
/// );
///
/// CREATE UNIQUE INDEX quotes_one_accepted_per_project
///     ON quotes (project_id) WHERE is_accepted;
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{trimmed, trimmed_opt};

/// Quote model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: Uuid,

    /// Offered price, always positive
    pub price: f64,

    pub description: String,

    /// Free-form duration estimate ("2 semanas")
    pub estimated_duration: Option<String>,

    pub project_id: Uuid,
    pub provider_id: Uuid,

    /// Set once, by the project's client
    pub is_accepted: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for submitting a quote
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuote {
    pub project_id: Uuid,

    /// Checked by [`SubmitQuote::check`]
    pub price: f64,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Estimated duration must be at most 100 characters"))]
    pub estimated_duration: Option<String>,
}

impl SubmitQuote {
    /// Trims the description and drops a blank duration
    pub fn normalized(self) -> Self {
        Self {
            description: trimmed(self.description),
            estimated_duration: trimmed_opt(self.estimated_duration),
            ..self
        }
    }

    /// Runs the derived field rules plus the positive-price rule
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(error) = validate_positive_price(self.price) {
            errors.add("price", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_positive_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive");
        error.message = Some("Price must be greater than zero".into());
        Err(error)
    }
}

/// Row data for inserting a quote
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub price: f64,
    pub description: String,
    pub estimated_duration: Option<String>,
    pub project_id: Uuid,
    pub provider_id: Uuid,
}

/// Quote projection with joined names and the provider's current rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteView {
    pub id: Uuid,
    pub price: f64,
    pub description: String,
    pub estimated_duration: Option<String>,
    pub project_id: Uuid,
    pub project_title: String,
    pub provider_id: Uuid,
    pub provider_name: String,

    /// Provider's average rating, rounded to one decimal
    pub provider_rating: f64,

    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl QuoteView {
    pub fn new(quote: Quote, project_title: String, provider_name: String, provider_rating: f64) -> Self {
        Self {
            id: quote.id,
            price: quote.price,
            description: quote.description,
            estimated_duration: quote.estimated_duration,
            project_id: quote.project_id,
            project_title,
            provider_id: quote.provider_id,
            provider_name,
            provider_rating,
            is_accepted: quote.is_accepted,
            created_at: quote.created_at,
        }
    }
}
