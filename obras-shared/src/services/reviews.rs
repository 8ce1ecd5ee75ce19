/// Review eligibility
///
/// A review is allowed once per (reviewer, reviewed, project), only on a
/// `completed` project, and only between its two participants: the client
/// reviews the provider and the provider reviews the client.

use tracing::{info, warn};
use validator::Validate;

use super::Marketplace;
use crate::error::{MarketError, MarketResult};
use crate::models::review::{NewReview, ReviewView, SubmitReview};
use crate::models::user::User;
use crate::store::REVIEWS_TRIPLE_KEY;

impl Marketplace {
    /// Submits a review of the actor's counterpart on a completed project
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// - `NotFound` if the project does not exist
    /// - `InvalidState` unless the project is `completed`
    /// - `Forbidden` unless the actor is a participant
    /// - `DuplicateReview` if the actor already reviewed this counterpart here
    /// - `Validation` if the rating is outside 1..=5
    pub async fn submit_review(&self, actor: &User, input: SubmitReview) -> MarketResult<ReviewView> {
        let project = self
            .store
            .find_project(input.project_id)
            .await?
            .ok_or(MarketError::NotFound("Project"))?;

        if !project.status.is_terminal() {
            warn!(
                project_id = %project.id,
                status = project.status.as_str(),
                "Review rejected: project not completed"
            );
            return Err(MarketError::InvalidState(
                "Reviews are only allowed on completed projects".to_string(),
            ));
        }

        let Some(reviewed_id) = project.counterpart_of(actor.id) else {
            warn!(project_id = %project.id, user_id = %actor.id, "Review denied: not a participant");
            return Err(MarketError::Forbidden(
                "Only the project's participants can review each other".to_string(),
            ));
        };

        if self
            .store
            .find_review(actor.id, reviewed_id, project.id)
            .await?
            .is_some()
        {
            return Err(MarketError::DuplicateReview);
        }

        input.validate()?;

        let review = self
            .store
            .insert_review(NewReview {
                rating: input.rating,
                comment: input.comment,
                reviewer_id: actor.id,
                reviewed_id,
                project_id: project.id,
            })
            .await
            .map_err(|e| {
                if e.is_duplicate_of(REVIEWS_TRIPLE_KEY) {
                    MarketError::DuplicateReview
                } else {
                    e.into()
                }
            })?;

        info!(
            review_id = %review.id,
            project_id = %project.id,
            reviewer_id = %actor.id,
            %reviewed_id,
            rating = review.rating,
            "Review submitted"
        );

        let reviewed_name = self.user_name(reviewed_id).await?;
        Ok(ReviewView::new(
            review,
            actor.name.clone(),
            reviewed_name,
            project.title,
        ))
    }
}
