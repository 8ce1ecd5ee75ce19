/// Marketplace operations
///
/// [`Marketplace`] is the single entry point for every action a user can
/// take. It owns a handle to the persistence port and the token signing
/// secret; it is cheap to clone and holds no other state.
///
/// Operations are grouped by concern:
///
/// - [`identity`]: registration, login, token verification, current identity
/// - [`rating`]: on-demand rating aggregates
/// - [`projects`]: project creation, listing and completion
/// - [`quotes`]: quote submission, acceptance and listings
/// - [`reviews`]: review eligibility and submission
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use obras_shared::services::Marketplace;
/// use obras_shared::store::memory::MemoryStore;
///
/// let market = Marketplace::new(
///     Arc::new(MemoryStore::new()),
///     "a-secret-that-is-at-least-32-bytes-long",
/// );
/// ```

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::auth::jwt::DEFAULT_EXPIRATION_DAYS;
use crate::error::{MarketError, MarketResult};
use crate::models::project::{Project, ProjectView};
use crate::models::quote::{Quote, QuoteView};
use crate::store::MarketStore;

pub mod identity;
pub mod projects;
pub mod quotes;
pub mod rating;
pub mod reviews;

pub use identity::Session;

/// Marketplace service
#[derive(Clone)]
pub struct Marketplace {
    store: Arc<dyn MarketStore>,
    jwt_secret: Arc<str>,
    token_lifetime: Duration,
}

impl Marketplace {
    /// Creates a service issuing tokens valid for the default 7 days
    pub fn new(store: Arc<dyn MarketStore>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret: Arc::from(jwt_secret.into()),
            token_lifetime: Duration::days(DEFAULT_EXPIRATION_DAYS),
        }
    }

    /// Overrides the token lifetime
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Persistence handle
    pub fn store(&self) -> &Arc<dyn MarketStore> {
        &self.store
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Display name of a user referenced by another row
    async fn user_name(&self, id: Uuid) -> MarketResult<String> {
        self.store
            .find_user_by_id(id)
            .await?
            .map(|user| user.name)
            .ok_or(MarketError::NotFound("User"))
    }

    async fn project_view(&self, project: Project) -> MarketResult<ProjectView> {
        let client_name = self.user_name(project.client_id).await?;
        let provider_name = match project.provider_id {
            Some(provider_id) => Some(self.user_name(provider_id).await?),
            None => None,
        };
        let quotes_count = self.store.count_quotes_for_project(project.id).await?;

        Ok(ProjectView::new(project, client_name, provider_name, quotes_count))
    }

    async fn quote_view(&self, quote: Quote) -> MarketResult<QuoteView> {
        let project_title = self
            .store
            .find_project(quote.project_id)
            .await?
            .map(|project| project.title)
            .ok_or(MarketError::NotFound("Project"))?;
        let provider_name = self.user_name(quote.provider_id).await?;
        let provider_rating = self.rating_summary(quote.provider_id).await?.display_average();

        Ok(QuoteView::new(quote, project_title, provider_name, provider_rating))
    }

    async fn quote_views(&self, quotes: Vec<Quote>) -> MarketResult<Vec<QuoteView>> {
        let mut views = Vec::with_capacity(quotes.len());
        for quote in quotes {
            views.push(self.quote_view(quote).await?);
        }
        Ok(views)
    }
}

impl std::fmt::Debug for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marketplace")
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}
