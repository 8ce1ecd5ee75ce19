/// Project endpoints (all authenticated)
///
/// - `GET /api/projects` - Own projects (client) or open projects (provider)
/// - `POST /api/projects` - Create a project (client)
/// - `GET /api/projects/:id/quotes` - Quotes on a project
/// - `POST /api/projects/:id/complete` - Mark a project completed (participant)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use obras_shared::models::{
    project::{CreateProject, ProjectView},
    quote::QuoteView,
    user::User,
};
use uuid::Uuid;

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<ProjectView>>> {
    Ok(Json(state.market.list_projects(&user).await?))
}

/// Create a project
///
/// ```text
/// POST /api/projects
///
/// {
///   "title": "Reforma da cozinha",
///   "description": "Trocar piso e azulejos",
///   "category": "reforma",
///   "location": "São Paulo",
///   "budget_min": 1000.0,
///   "budget_max": 5000.0
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a client
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProjectView>)> {
    let Json(input) = payload?;
    let project = state.market.create_project(&user, input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn project_quotes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    project_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<QuoteView>>> {
    let Path(project_id) = project_id?;
    Ok(Json(state.market.quotes_for_project(&user, project_id).await?))
}

/// Complete a project
///
/// # Errors
///
/// - `400 Bad Request`: No quote accepted yet
/// - `403 Forbidden`: Caller is not the client or assigned provider
/// - `404 Not Found`: Unknown project
pub async fn complete_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    project_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProjectView>> {
    let Path(project_id) = project_id?;
    Ok(Json(state.market.complete_project(&user, project_id).await?))
}
