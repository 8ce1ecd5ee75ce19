/// PostgreSQL store
///
/// Runtime-checked sqlx queries against the schema in `migrations/`. Unique
/// and foreign-key violations are translated into [`StoreError`] variants;
/// every other failure is passed through as `StoreError::Database`.
///
/// # Example
///
/// ```no_run
/// use obras_shared::db::pool::{create_pool, DatabaseConfig};
/// use obras_shared::store::postgres::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// let store = PgStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{MarketStore, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::project::{NewProject, Project, ProjectStatus};
use crate::models::quote::{NewQuote, Quote};
use crate::models::rating::RatingSummary;
use crate::models::review::{NewReview, Review};
use crate::models::user::{NewUser, User, UserRole};

/// sqlx-backed [`MarketStore`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translates constraint violations raised by an INSERT
///
/// `missing` names the entity a failed foreign key points at.
fn map_write_error(err: sqlx::Error, missing: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(db_err.constraint().unwrap_or_default().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::NotFound(missing);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl MarketStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, phone, role, description, website, instagram)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, password_hash, phone, role, description, website,
                      instagram, created_at, last_login_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.phone)
        .bind(user.role)
        .bind(user.description)
        .bind(user.website)
        .bind(user.instagram)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, role, description, website,
                   instagram, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, role, description, website,
                   instagram, created_at, last_login_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        Ok(())
    }

    async fn list_users_by_role(&self, role: UserRole) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, role, description, website,
                   instagram, created_at, last_login_at
            FROM users
            WHERE role = $1
            ORDER BY name ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, category, location, budget_min, budget_max, client_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, category, location, budget_min, budget_max,
                      status, client_id, provider_id, created_at, updated_at
            "#,
        )
        .bind(project.title)
        .bind(project.description)
        .bind(project.category)
        .bind(project.location)
        .bind(project.budget_min)
        .bind(project.budget_max)
        .bind(project.client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, location, budget_min, budget_max,
                   status, client_id, provider_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, location, budget_min, budget_max,
                   status, client_id, provider_id, created_at, updated_at
            FROM projects
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_projects_by_status(&self, status: ProjectStatus) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, location, budget_min, budget_max,
                   status, client_id, provider_id, created_at, updated_at
            FROM projects
            WHERE status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn count_quotes_for_project(&self, project_id: Uuid) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn complete_project(&self, project_id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1 AND status IN ('in_progress', 'completed')
            RETURNING id, title, description, category, location, budget_min, budget_max,
                      status, client_id, provider_id, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn insert_quote(&self, quote: NewQuote) -> StoreResult<Quote> {
        sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (price, description, estimated_duration, project_id, provider_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, price, description, estimated_duration, project_id, provider_id,
                      is_accepted, created_at
            "#,
        )
        .bind(quote.price)
        .bind(quote.description)
        .bind(quote.estimated_duration)
        .bind(quote.project_id)
        .bind(quote.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Project"))
    }

    async fn find_quote(&self, id: Uuid) -> StoreResult<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, price, description, estimated_duration, project_id, provider_id,
                   is_accepted, created_at
            FROM quotes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    async fn list_quotes_by_provider(&self, provider_id: Uuid) -> StoreResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, price, description, estimated_duration, project_id, provider_id,
                   is_accepted, created_at
            FROM quotes
            WHERE provider_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    async fn list_quotes_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, price, description, estimated_duration, project_id, provider_id,
                   is_accepted, created_at
            FROM quotes
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    async fn accept_quote(&self, quote_id: Uuid) -> StoreResult<(Project, Quote)> {
        let mut tx = self.pool.begin().await?;

        let project_id: Uuid = sqlx::query_scalar("SELECT project_id FROM quotes WHERE id = $1")
            .bind(quote_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("Quote"))?;

        // Serializes concurrent acceptances on the same project
        let status: ProjectStatus =
            sqlx::query_scalar("SELECT status FROM projects WHERE id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::NotFound("Project"))?;

        if status != ProjectStatus::Open {
            debug!(%quote_id, %project_id, status = status.as_str(), "Project no longer open");
            return Err(StoreError::NotOpen);
        }

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET is_accepted = TRUE
            WHERE id = $1
            RETURNING id, price, description, estimated_duration, project_id, provider_id,
                      is_accepted, created_at
            "#,
        )
        .bind(quote_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Quote"))?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET status = 'in_progress', provider_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, category, location, budget_min, budget_max,
                      status, client_id, provider_id, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(quote.provider_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((project, quote))
    }

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (rating, comment, reviewer_id, reviewed_id, project_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, rating, comment, reviewer_id, reviewed_id, project_id, created_at
            "#,
        )
        .bind(review.rating)
        .bind(review.comment)
        .bind(review.reviewer_id)
        .bind(review.reviewed_id)
        .bind(review.project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Project"))
    }

    async fn find_review(
        &self,
        reviewer_id: Uuid,
        reviewed_id: Uuid,
        project_id: Uuid,
    ) -> StoreResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, rating, comment, reviewer_id, reviewed_id, project_id, created_at
            FROM reviews
            WHERE reviewer_id = $1 AND reviewed_id = $2 AND project_id = $3
            "#,
        )
        .bind(reviewer_id)
        .bind(reviewed_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn rating_summary(&self, user_id: Uuid) -> StoreResult<RatingSummary> {
        let (average, count): (f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(AVG(rating)::DOUBLE PRECISION, 0), COUNT(*)
            FROM reviews
            WHERE reviewed_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary { average, count })
    }
}
