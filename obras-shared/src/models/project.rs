/// Project model and lifecycle states
///
/// A project is a unit of work posted by a client. It moves through a
/// one-directional state machine:
///
/// ```text
/// open ──(quote accepted)──> in_progress ──(complete)──> completed
/// ```
///
/// `provider_id` is assigned exactly once, when a quote is accepted, so it is
/// `None` if and only if the project is still `open`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('open', 'in_progress', 'completed');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL,
///     category VARCHAR(50) NOT NULL,
///     location VARCHAR(200) NOT NULL,
///     budget_min DOUBLE PRECISION,
///     budget_max DOUBLE PRECISION,
///     status project_status NOT NULL DEFAULT 'open',
///     client_id UUID NOT NULL REFERENCES users(id),
///     provider_id UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::trimmed;

/// Project lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Accepting quotes, no provider assigned
    Open,

    /// A quote was accepted and a provider is assigned
    InProgress,

    /// Work finished; reviews may be submitted
    Completed,
}

impl ProjectStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Checks if no further transition can leave this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed)
    }

    /// Checks if transition to target state is valid
    ///
    /// `Completed -> Completed` is allowed so completion can be retried.
    pub fn can_transition_to(&self, target: ProjectStatus) -> bool {
        match (self, target) {
            (ProjectStatus::Open, ProjectStatus::InProgress) => true,
            (ProjectStatus::InProgress, ProjectStatus::Completed) => true,
            (ProjectStatus::Completed, ProjectStatus::Completed) => true,
            _ => false,
        }
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,

    /// Lower budget bound (optional)
    pub budget_min: Option<f64>,

    /// Upper budget bound (optional)
    pub budget_max: Option<f64>,

    /// Current lifecycle state
    pub status: ProjectStatus,

    /// Owning client, immutable
    pub client_id: Uuid,

    /// Assigned provider, set at quote acceptance
    pub provider_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Checks if the user is the owning client or the assigned provider
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.provider_id == Some(user_id)
    }

    /// Resolves the other participant for a review written by `reviewer_id`
    ///
    /// Returns `None` if the reviewer is not a participant or no provider has
    /// been assigned yet.
    pub fn counterpart_of(&self, reviewer_id: Uuid) -> Option<Uuid> {
        if reviewer_id == self.client_id {
            self.provider_id
        } else if self.provider_id == Some(reviewer_id) {
            Some(self.client_id)
        } else {
            None
        }
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_budget_range", skip_on_field_errors = false))]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget_min: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget_max: Option<f64>,
}

impl CreateProject {
    /// Trims text fields
    pub fn normalized(self) -> Self {
        Self {
            title: trimmed(self.title),
            description: trimmed(self.description),
            category: trimmed(self.category),
            location: trimmed(self.location),
            ..self
        }
    }
}

fn validate_budget_range(project: &CreateProject) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (project.budget_min, project.budget_max) {
        if min > max {
            let mut error = ValidationError::new("budget_range");
            error.message = Some("budget_min must not exceed budget_max".into());
            return Err(error);
        }
    }
    Ok(())
}

/// Row data for inserting a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub client_id: Uuid,
}

/// Project projection with joined names and quote count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub status: ProjectStatus,
    pub client_id: Uuid,
    pub client_name: String,
    pub provider_id: Option<Uuid>,
    pub provider_name: Option<String>,
    pub quotes_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ProjectView {
    pub fn new(
        project: Project,
        client_name: String,
        provider_name: Option<String>,
        quotes_count: i64,
    ) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            category: project.category,
            location: project.location,
            budget_min: project.budget_min,
            budget_max: project.budget_max,
            status: project.status,
            client_id: project.client_id,
            client_name,
            provider_id: project.provider_id,
            provider_name,
            quotes_count,
            created_at: project.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(status: ProjectStatus, provider_id: Option<Uuid>) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Reforma da cozinha".to_string(),
            description: "Trocar piso e azulejos".to_string(),
            category: "reforma".to_string(),
            location: "São Paulo".to_string(),
            budget_min: Some(1000.0),
            budget_max: Some(5000.0),
            status,
            client_id: Uuid::new_v4(),
            provider_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_text_rejected_after_normalizing() {
        let input = CreateProject {
            title: "  Reforma  ".to_string(),
            description: "   ".to_string(),
            category: "reforma".to_string(),
            location: " ".to_string(),
            budget_min: None,
            budget_max: None,
        }
        .normalized();

        assert_eq!(input.title, "Reforma");
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("location"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(ProjectStatus::Open.as_str(), "open");
        assert_eq!(ProjectStatus::InProgress.as_str(), "in_progress");
        assert_eq!(ProjectStatus::Completed.as_str(), "completed");
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn test_status_transitions() {
        assert!(ProjectStatus::Open.can_transition_to(ProjectStatus::InProgress));
        assert!(ProjectStatus::InProgress.can_transition_to(ProjectStatus::Completed));
        assert!(ProjectStatus::Completed.can_transition_to(ProjectStatus::Completed));

        // No skipping, no regression
        assert!(!ProjectStatus::Open.can_transition_to(ProjectStatus::Completed));
        assert!(!ProjectStatus::InProgress.can_transition_to(ProjectStatus::Open));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::InProgress));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::Open));
    }

    #[test]
    fn test_is_terminal() {
        assert!(!ProjectStatus::Open.is_terminal());
        assert!(!ProjectStatus::InProgress.is_terminal());
        assert!(ProjectStatus::Completed.is_terminal());
    }

    #[test]
    fn test_participants_and_counterpart() {
        let provider_id = Uuid::new_v4();
        let p = project(ProjectStatus::Completed, Some(provider_id));
        let outsider = Uuid::new_v4();

        assert!(p.is_participant(p.client_id));
        assert!(p.is_participant(provider_id));
        assert!(!p.is_participant(outsider));

        assert_eq!(p.counterpart_of(p.client_id), Some(provider_id));
        assert_eq!(p.counterpart_of(provider_id), Some(p.client_id));
        assert_eq!(p.counterpart_of(outsider), None);
    }

    #[test]
    fn test_open_project_has_no_counterpart_for_client() {
        let p = project(ProjectStatus::Open, None);
        assert_eq!(p.counterpart_of(p.client_id), None);
    }

    #[test]
    fn test_create_project_budget_validation() {
        let input = CreateProject {
            title: "Pintura".to_string(),
            description: "Pintar a fachada".to_string(),
            category: "pintura".to_string(),
            location: "Campinas".to_string(),
            budget_min: Some(3000.0),
            budget_max: Some(2000.0),
        };
        assert!(input.validate().is_err());

        let only_max = CreateProject {
            budget_min: None,
            ..input.clone()
        };
        assert!(only_max.validate().is_ok());

        let negative = CreateProject {
            budget_min: Some(-1.0),
            budget_max: None,
            ..input
        };
        let errors = negative.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("budget_min"));
    }

    #[test]
    fn test_create_project_requires_title() {
        let input = CreateProject {
            title: String::new(),
            description: "x".to_string(),
            category: "x".to_string(),
            location: "x".to_string(),
            budget_min: None,
            budget_max: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
