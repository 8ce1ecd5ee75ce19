/// Authentication endpoints
///
/// - `POST /api/auth/register` - Create an account and get a token
/// - `POST /api/auth/login` - Exchange credentials for a token
/// - `GET /api/auth/me` - Current identity (authenticated)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use obras_shared::{
    models::user::{Credentials, Registration, User, UserProfile},
    services::Session,
};

/// Register a new client or provider
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ana Souza",
///   "email": "ana@example.com",
///   "password": "reforma2024",
///   "phone": "11999990000",
///   "role": "client"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let Json(registration) = payload?;
    let session = state.market.register(registration).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Log in with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<Session>> {
    let Json(credentials) = payload?;
    let session = state.market.authenticate(credentials).await?;
    Ok(Json(session))
}

/// Profile of the token's owner, with rating aggregates
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.market.current_identity(&user).await?))
}
