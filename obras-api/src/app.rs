/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use obras_api::{app::{build_router, AppState}, config::Config};
/// use obras_shared::{store::memory::MemoryStore, Marketplace};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let market = Marketplace::new(Arc::new(MemoryStore::new()), config.jwt.secret.clone());
/// let app = build_router(AppState::new(market, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use obras_shared::Marketplace;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request by axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Marketplace service
    pub market: Marketplace,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(market: Marketplace, config: Config) -> Self {
        Self {
            market,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── GET  /me                    (auth)
///     ├── /projects/                      (auth)
///     │   ├── GET  /
///     │   ├── POST /
///     │   ├── GET  /:id/quotes
///     │   └── POST /:id/complete
///     ├── /quotes/                        (auth)
///     │   ├── POST /
///     │   ├── POST /:id/accept
///     │   └── GET  /my-quotes
///     ├── /users/providers                (auth)
///     └── /reviews                        (auth)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::middleware::auth::require_user;
    use crate::routes;

    let auth_layer = axum::middleware::from_fn_with_state(state.clone(), require_user);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let session_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(auth_layer.clone());

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route("/:id/quotes", get(routes::projects::project_quotes))
        .route("/:id/complete", post(routes::projects::complete_project))
        .layer(auth_layer.clone());

    let quote_routes = Router::new()
        .route("/", post(routes::quotes::submit_quote))
        .route("/my-quotes", get(routes::quotes::my_quotes))
        .route("/:id/accept", post(routes::quotes::accept_quote))
        .layer(auth_layer.clone());

    let user_routes = Router::new()
        .route("/providers", get(routes::users::list_providers))
        .layer(auth_layer.clone());

    let review_routes = Router::new()
        .route("/", post(routes::reviews::submit_review))
        .layer(auth_layer);

    let api_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(session_routes))
        .nest("/projects", project_routes)
        .nest("/quotes", quote_routes)
        .nest("/users", user_routes)
        .nest("/reviews", review_routes);

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
