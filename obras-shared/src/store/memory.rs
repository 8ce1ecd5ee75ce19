/// In-memory store
///
/// All tables sit behind one `tokio::sync::RwLock`, so every mutation is
/// atomic with respect to every other. Uniqueness rules mirror the
/// PostgreSQL schema and report the same constraint names.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    MarketStore, StoreError, StoreResult, QUOTES_PROJECT_PROVIDER_KEY, REVIEWS_TRIPLE_KEY,
    USERS_EMAIL_KEY,
};
use crate::models::project::{NewProject, Project, ProjectStatus};
use crate::models::quote::{NewQuote, Quote};
use crate::models::rating::RatingSummary;
use crate::models::review::{NewReview, Review};
use crate::models::user::{NewUser, User, UserRole};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    quotes: Vec<Quote>,
    reviews: Vec<Review>,
}

/// Volatile [`MarketStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(USERS_EMAIL_KEY.to_string()));
        }

        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            role: user.role,
            description: user.description,
            website: user.website,
            instagram: user.instagram,
            created_at: Utc::now(),
            last_login_at: None,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.last_login_at = Some(Utc::now());
        Ok(())
    }

    async fn list_users_by_role(&self, role: UserRole) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == project.client_id) {
            return Err(StoreError::NotFound("User"));
        }

        let now = Utc::now();
        let row = Project {
            id: Uuid::new_v4(),
            title: project.title,
            description: project.description,
            category: project.category,
            location: project.location,
            budget_min: project.budget_min,
            budget_max: project.budget_max,
            status: ProjectStatus::Open,
            client_id: project.client_id,
            provider_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(row.clone());
        Ok(row)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        // Rows are kept in insertion order
        Ok(tables
            .projects
            .iter()
            .rev()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_projects_by_status(&self, status: ProjectStatus) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .rev()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn count_quotes_for_project(&self, project_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .quotes
            .iter()
            .filter(|q| q.project_id == project_id)
            .count() as i64)
    }

    async fn complete_project(&self, project_id: Uuid) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        let Some(project) = tables.projects.iter_mut().find(|p| p.id == project_id) else {
            return Ok(None);
        };

        if !project.status.can_transition_to(ProjectStatus::Completed) {
            return Ok(None);
        }

        project.status = ProjectStatus::Completed;
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn insert_quote(&self, quote: NewQuote) -> StoreResult<Quote> {
        let mut tables = self.tables.write().await;

        if !tables.projects.iter().any(|p| p.id == quote.project_id) {
            return Err(StoreError::NotFound("Project"));
        }

        if tables
            .quotes
            .iter()
            .any(|q| q.project_id == quote.project_id && q.provider_id == quote.provider_id)
        {
            return Err(StoreError::Duplicate(QUOTES_PROJECT_PROVIDER_KEY.to_string()));
        }

        let row = Quote {
            id: Uuid::new_v4(),
            price: quote.price,
            description: quote.description,
            estimated_duration: quote.estimated_duration,
            project_id: quote.project_id,
            provider_id: quote.provider_id,
            is_accepted: false,
            created_at: Utc::now(),
        };
        tables.quotes.push(row.clone());
        Ok(row)
    }

    async fn find_quote(&self, id: Uuid) -> StoreResult<Option<Quote>> {
        let tables = self.tables.read().await;
        Ok(tables.quotes.iter().find(|q| q.id == id).cloned())
    }

    async fn list_quotes_by_provider(&self, provider_id: Uuid) -> StoreResult<Vec<Quote>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quotes
            .iter()
            .rev()
            .filter(|q| q.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn list_quotes_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Quote>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quotes
            .iter()
            .rev()
            .filter(|q| q.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn accept_quote(&self, quote_id: Uuid) -> StoreResult<(Project, Quote)> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let quote = tables
            .quotes
            .iter_mut()
            .find(|q| q.id == quote_id)
            .ok_or(StoreError::NotFound("Quote"))?;

        let project_id = quote.project_id;
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or(StoreError::NotFound("Project"))?;

        if project.status != ProjectStatus::Open {
            return Err(StoreError::NotOpen);
        }

        quote.is_accepted = true;
        project.status = ProjectStatus::InProgress;
        project.provider_id = Some(quote.provider_id);
        project.updated_at = Utc::now();

        Ok((project.clone(), quote.clone()))
    }

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review> {
        let mut tables = self.tables.write().await;

        if tables.reviews.iter().any(|r| {
            r.reviewer_id == review.reviewer_id
                && r.reviewed_id == review.reviewed_id
                && r.project_id == review.project_id
        }) {
            return Err(StoreError::Duplicate(REVIEWS_TRIPLE_KEY.to_string()));
        }

        let row = Review {
            id: Uuid::new_v4(),
            rating: review.rating,
            comment: review.comment,
            reviewer_id: review.reviewer_id,
            reviewed_id: review.reviewed_id,
            project_id: review.project_id,
            created_at: Utc::now(),
        };
        tables.reviews.push(row.clone());
        Ok(row)
    }

    async fn find_review(
        &self,
        reviewer_id: Uuid,
        reviewed_id: Uuid,
        project_id: Uuid,
    ) -> StoreResult<Option<Review>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .find(|r| {
                r.reviewer_id == reviewer_id
                    && r.reviewed_id == reviewed_id
                    && r.project_id == project_id
            })
            .cloned())
    }

    async fn rating_summary(&self, user_id: Uuid) -> StoreResult<RatingSummary> {
        let tables = self.tables.read().await;
        let ratings: Vec<i32> = tables
            .reviews
            .iter()
            .filter(|r| r.reviewed_id == user_id)
            .map(|r| r.rating)
            .collect();
        Ok(RatingSummary::from_ratings(&ratings))
    }
}
