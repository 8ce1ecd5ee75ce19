/// Provider directory
///
/// `GET /api/users/providers` lists every provider with rating aggregates.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use obras_shared::models::user::{User, UserProfile};

pub async fn list_providers(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(state.market.list_providers(&user).await?))
}
