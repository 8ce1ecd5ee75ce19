/// Quote ledger
///
/// One quote per (project, provider); acceptance flips the quote, the
/// project status and the project's provider in a single store call.

use tracing::{info, warn};
use uuid::Uuid;

use super::Marketplace;
use crate::error::{MarketError, MarketResult};
use crate::models::project::ProjectView;
use crate::models::quote::{NewQuote, QuoteView, SubmitQuote};
use crate::models::user::User;
use crate::store::{StoreError, QUOTES_ONE_ACCEPTED_INDEX, QUOTES_PROJECT_PROVIDER_KEY};

impl Marketplace {
    /// Submits a provider's bid on a project
    ///
    /// Quoting is allowed whatever the project's status.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the actor is a provider
    /// - `Validation` if the price is not positive or the description is empty
    /// - `NotFound` if the project does not exist
    /// - `DuplicateQuote` if the actor already quoted this project
    pub async fn submit_quote(&self, actor: &User, input: SubmitQuote) -> MarketResult<QuoteView> {
        if !actor.role.can_submit_quotes() {
            warn!(user_id = %actor.id, "Quote denied: not a provider");
            return Err(MarketError::Forbidden(
                "Only providers can submit quotes".to_string(),
            ));
        }

        let input = input.normalized();
        input.check()?;

        if self.store.find_project(input.project_id).await?.is_none() {
            return Err(MarketError::NotFound("Project"));
        }

        let quote = self
            .store
            .insert_quote(NewQuote {
                price: input.price,
                description: input.description,
                estimated_duration: input.estimated_duration,
                project_id: input.project_id,
                provider_id: actor.id,
            })
            .await
            .map_err(|e| {
                if e.is_duplicate_of(QUOTES_PROJECT_PROVIDER_KEY) {
                    warn!(project_id = %input.project_id, provider_id = %actor.id, "Duplicate quote");
                    MarketError::DuplicateQuote
                } else {
                    e.into()
                }
            })?;

        info!(
            quote_id = %quote.id,
            project_id = %quote.project_id,
            provider_id = %actor.id,
            "Quote submitted"
        );

        self.quote_view(quote).await
    }

    /// Accepts a quote on behalf of the project's client
    ///
    /// Sets the quote accepted, moves the project to `in_progress` and
    /// assigns the quote's provider, all or nothing. Other quotes on the
    /// project are left as they are.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the quote does not exist
    /// - `Forbidden` unless the actor is the project's client
    /// - `Conflict` if the project is no longer `open`
    pub async fn accept_quote(&self, actor: &User, quote_id: Uuid) -> MarketResult<ProjectView> {
        let quote = self
            .store
            .find_quote(quote_id)
            .await?
            .ok_or(MarketError::NotFound("Quote"))?;

        let project = self
            .store
            .find_project(quote.project_id)
            .await?
            .ok_or(MarketError::NotFound("Project"))?;

        if project.client_id != actor.id {
            warn!(%quote_id, user_id = %actor.id, "Acceptance denied: not the project's client");
            return Err(MarketError::Forbidden(
                "Only the project's client can accept quotes".to_string(),
            ));
        }

        let (project, _quote) = self.store.accept_quote(quote_id).await.map_err(|e| match e {
            StoreError::NotOpen => {
                warn!(%quote_id, project_id = %project.id, "Acceptance lost: project not open");
                MarketError::Conflict("Project is no longer open".to_string())
            }
            e if e.is_duplicate_of(QUOTES_ONE_ACCEPTED_INDEX) => {
                MarketError::Conflict("Project already has an accepted quote".to_string())
            }
            e => e.into(),
        })?;

        info!(
            %quote_id,
            project_id = %project.id,
            client_id = %actor.id,
            "Quote accepted"
        );

        self.project_view(project).await
    }

    /// All quotes submitted by the acting provider
    pub async fn my_quotes(&self, actor: &User) -> MarketResult<Vec<QuoteView>> {
        if !actor.is_provider() {
            return Err(MarketError::Forbidden(
                "Only providers have quotes".to_string(),
            ));
        }

        let quotes = self.store.list_quotes_by_provider(actor.id).await?;
        self.quote_views(quotes).await
    }

    /// Quotes on a project
    ///
    /// Visible to the owning client and to any provider.
    pub async fn quotes_for_project(
        &self,
        actor: &User,
        project_id: Uuid,
    ) -> MarketResult<Vec<QuoteView>> {
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or(MarketError::NotFound("Project"))?;

        if actor.is_client() && project.client_id != actor.id {
            warn!(%project_id, user_id = %actor.id, "Quote listing denied: not the owner");
            return Err(MarketError::Forbidden(
                "Only the project's client can view its quotes".to_string(),
            ));
        }

        let quotes = self.store.list_quotes_by_project(project_id).await?;
        self.quote_views(quotes).await
    }
}
