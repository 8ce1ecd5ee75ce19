/// Rating aggregates
///
/// Read-only; every call recomputes from the review rows.

use uuid::Uuid;

use super::Marketplace;
use crate::error::MarketResult;
use crate::models::rating::RatingSummary;

impl Marketplace {
    /// Mean rating received by the user at full precision, 0 with no reviews
    pub async fn average_rating(&self, user_id: Uuid) -> MarketResult<f64> {
        Ok(self.rating_summary(user_id).await?.average)
    }

    /// Number of reviews received by the user
    pub async fn review_count(&self, user_id: Uuid) -> MarketResult<i64> {
        Ok(self.rating_summary(user_id).await?.count)
    }

    pub async fn rating_summary(&self, user_id: Uuid) -> MarketResult<RatingSummary> {
        Ok(self.store.rating_summary(user_id).await?)
    }
}
