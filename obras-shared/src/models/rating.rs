/// Rating aggregation over received reviews
///
/// Aggregates are recomputed from review rows on every read; there is no
/// stored average to keep in sync.

use serde::{Deserialize, Serialize};

/// Average rating and review count for one user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Arithmetic mean at full precision (0 when there are no reviews)
    pub average: f64,

    /// Number of reviews received
    pub count: i64,
}

impl RatingSummary {
    /// Builds a summary from raw ratings
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        let count = ratings.len() as i64;

        Self {
            average: sum as f64 / count as f64,
            count,
        }
    }

    /// Average rounded to one decimal place for presentation
    pub fn display_average(&self) -> f64 {
        round_one_decimal(self.average)
    }
}

/// Rounds to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
