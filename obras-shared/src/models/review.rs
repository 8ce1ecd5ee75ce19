/// Review model
///
/// A 1-5 rating with optional comment, written by one participant of a
/// completed project about the other. Reviews are immutable once written.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reviews (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
///     comment TEXT,
///     reviewer_id UUID NOT NULL REFERENCES users(id),
///     reviewed_id UUID NOT NULL REFERENCES users(id),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CHECK (reviewer_id <> reviewed_id),
///     UNIQUE (reviewer_id, reviewed_id, project_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lowest allowed rating
pub const MIN_RATING: i32 = 1;

/// Highest allowed rating
pub const MAX_RATING: i32 = 5;

/// Review model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub project_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a review
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReview {
    pub project_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    pub comment: Option<String>,
}

/// Row data for inserting a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub project_id: Uuid,
}

/// Review projection with human-readable names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub reviewed_name: String,
    pub project_title: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewView {
    pub fn new(review: Review, reviewer_name: String, reviewed_name: String, project_title: String) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            reviewer_name,
            reviewed_name,
            project_title,
            created_at: review.created_at,
        }
    }
}
