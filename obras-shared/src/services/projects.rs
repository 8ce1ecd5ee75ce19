/// Project lifecycle
///
/// ```text
/// open ──accept_quote──> in_progress ──complete_project──> completed
/// ```
///
/// The `open -> in_progress` edge is only reachable through
/// [`Marketplace::accept_quote`].

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::Marketplace;
use crate::error::{MarketError, MarketResult};
use crate::models::project::{CreateProject, NewProject, ProjectStatus, ProjectView};
use crate::models::user::User;

impl Marketplace {
    /// Posts a new `open` project owned by the acting client
    pub async fn create_project(
        &self,
        actor: &User,
        input: CreateProject,
    ) -> MarketResult<ProjectView> {
        if !actor.role.can_create_projects() {
            warn!(user_id = %actor.id, "Project creation denied: not a client");
            return Err(MarketError::Forbidden(
                "Only clients can create projects".to_string(),
            ));
        }

        let input = input.normalized();
        input.validate()?;

        let project = self
            .store
            .insert_project(NewProject {
                title: input.title,
                description: input.description,
                category: input.category,
                location: input.location,
                budget_min: input.budget_min,
                budget_max: input.budget_max,
                client_id: actor.id,
            })
            .await?;

        info!(project_id = %project.id, client_id = %actor.id, "Project created");

        self.project_view(project).await
    }

    /// Projects visible to the actor
    ///
    /// Clients see all of their own projects; providers see every `open`
    /// project.
    pub async fn list_projects(&self, actor: &User) -> MarketResult<Vec<ProjectView>> {
        let projects = if actor.is_client() {
            self.store.list_projects_by_client(actor.id).await?
        } else {
            self.store.list_projects_by_status(ProjectStatus::Open).await?
        };

        let mut views = Vec::with_capacity(projects.len());
        for project in projects {
            views.push(self.project_view(project).await?);
        }
        Ok(views)
    }

    /// Marks a project as finished
    ///
    /// Either participant may complete it. Completing an already completed
    /// project succeeds again without changing anything but `updated_at`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Forbidden` unless the actor is the client or the assigned provider
    /// - `InvalidState` if no quote has been accepted yet
    pub async fn complete_project(
        &self,
        actor: &User,
        project_id: Uuid,
    ) -> MarketResult<ProjectView> {
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or(MarketError::NotFound("Project"))?;

        if !project.is_participant(actor.id) {
            warn!(%project_id, user_id = %actor.id, "Completion denied: not a participant");
            return Err(MarketError::Forbidden(
                "Only the project's client or assigned provider can complete it".to_string(),
            ));
        }

        if !project.status.can_transition_to(ProjectStatus::Completed) {
            warn!(%project_id, status = project.status.as_str(), "Completion rejected");
            return Err(MarketError::InvalidState(
                "Project has no accepted quote yet".to_string(),
            ));
        }

        let project = self
            .store
            .complete_project(project_id)
            .await?
            .ok_or_else(|| MarketError::InvalidState("Project cannot be completed".to_string()))?;

        info!(%project_id, user_id = %actor.id, "Project completed");

        self.project_view(project).await
    }
}
