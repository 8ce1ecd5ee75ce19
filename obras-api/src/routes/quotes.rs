/// Quote endpoints (all authenticated)
///
/// - `POST /api/quotes` - Submit a quote (provider)
/// - `POST /api/quotes/:id/accept` - Accept a quote (project's client)
/// - `GET /api/quotes/my-quotes` - Caller's own quotes (provider)

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
    project::ProjectView,
    quote::{QuoteView, SubmitQuote},
    user::User,
};
use uuid::Uuid;

/// Submit a quote
///
/// ```text
/// POST /api/quotes
///
/// {
///   "project_id": "uuid",
///   "price": 3500.0,
///   "description": "Material e mão de obra",
///   "estimated_duration": "2 semanas"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a provider
/// - `404 Not Found`: Unknown project
/// - `409 Conflict`: Caller already quoted this project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn submit_quote(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<SubmitQuote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<QuoteView>)> {
    let Json(input) = payload?;
    let quote = state.market.submit_quote(&user, input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// Accept a quote; returns the project, now in progress
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the project's client
/// - `404 Not Found`: Unknown quote
/// - `409 Conflict`: Project is no longer open
pub async fn accept_quote(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    quote_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProjectView>> {
    let Path(quote_id) = quote_id?;
    Ok(Json(state.market.accept_quote(&user, quote_id).await?))
}

pub async fn my_quotes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<QuoteView>>> {
    Ok(Json(state.market.my_quotes(&user).await?))
}
