/// Persistence port for the marketplace
///
/// [`MarketStore`] is the only way the service layer touches durable state.
/// Two adapters implement it:
///
/// - [`postgres::PgStore`]: sqlx over PostgreSQL, used by the server
/// - [`memory::MemoryStore`]: `RwLock`-guarded tables, used by tests and local runs
///
/// Both enforce the same uniqueness rules and report violations as
/// [`StoreError::Duplicate`] carrying the constraint name, so callers can map
/// a lost race back to the right domain error.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::project::{NewProject, Project, ProjectStatus};
use crate::models::quote::{NewQuote, Quote};
use crate::models::rating::RatingSummary;
use crate::models::review::{NewReview, Review};
use crate::models::user::{NewUser, User, UserRole};

pub mod memory;
pub mod postgres;

/// Unique constraint on `users(email)`
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Unique constraint on `quotes(project_id, provider_id)`
pub const QUOTES_PROJECT_PROVIDER_KEY: &str = "quotes_project_provider_key";

/// Partial unique index allowing one accepted quote per project
pub const QUOTES_ONE_ACCEPTED_INDEX: &str = "quotes_one_accepted_per_project";

/// Unique constraint on `reviews(reviewer_id, reviewed_id, project_id)`
pub const REVIEWS_TRIPLE_KEY: &str = "reviews_reviewer_reviewed_project_key";

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Referenced row does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique constraint violated
    #[error("Duplicate row violates {0}")]
    Duplicate(String),

    /// Project left `open` before the acceptance could lock it
    #[error("Project is no longer open")]
    NotOpen,

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Checks if this is a violation of the named unique constraint
    pub fn is_duplicate_of(&self, constraint: &str) -> bool {
        matches!(self, StoreError::Duplicate(name) if name == constraint)
    }
}

/// Marketplace persistence operations
///
/// List operations return newest rows first unless noted otherwise.
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Checks that the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a user; `Duplicate(USERS_EMAIL_KEY)` if the email is taken
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Looks up by already-normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Stamps `last_login_at` with the current time
    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()>;

    /// All users with the given role, ordered by name
    async fn list_users_by_role(&self, role: UserRole) -> StoreResult<Vec<User>>;

    async fn insert_project(&self, project: NewProject) -> StoreResult<Project>;

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    async fn list_projects_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Project>>;

    async fn list_projects_by_status(&self, status: ProjectStatus) -> StoreResult<Vec<Project>>;

    async fn count_quotes_for_project(&self, project_id: Uuid) -> StoreResult<i64>;

    /// Moves an `in_progress` or `completed` project to `completed`
    ///
    /// Returns `None` when the project is missing or still `open`.
    async fn complete_project(&self, project_id: Uuid) -> StoreResult<Option<Project>>;

    /// Inserts a quote; `Duplicate(QUOTES_PROJECT_PROVIDER_KEY)` if the
    /// provider already quoted the project
    async fn insert_quote(&self, quote: NewQuote) -> StoreResult<Quote>;

    async fn find_quote(&self, id: Uuid) -> StoreResult<Option<Quote>>;

    async fn list_quotes_by_provider(&self, provider_id: Uuid) -> StoreResult<Vec<Quote>>;

    async fn list_quotes_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Quote>>;

    /// Accepts a quote and assigns its provider to the project, atomically
    ///
    /// The project is locked for the duration. Fails with `NotOpen` if the
    /// project is no longer `open` once the lock is held; on any failure
    /// neither the quote nor the project is modified.
    async fn accept_quote(&self, quote_id: Uuid) -> StoreResult<(Project, Quote)>;

    /// Inserts a review; `Duplicate(REVIEWS_TRIPLE_KEY)` on an existing triple
    async fn insert_review(&self, review: NewReview) -> StoreResult<Review>;

    async fn find_review(
        &self,
        reviewer_id: Uuid,
        reviewed_id: Uuid,
        project_id: Uuid,
    ) -> StoreResult<Option<Review>>;

    /// Average and count over reviews received by the user
    async fn rating_summary(&self, user_id: Uuid) -> StoreResult<RatingSummary>;
}
