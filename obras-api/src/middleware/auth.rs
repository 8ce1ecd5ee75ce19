/// Bearer token authentication
///
/// Resolves the `Authorization` header through
/// [`Marketplace::verify_token`](obras_shared::Marketplace::verify_token) and
/// stores the acting [`User`] in the request extensions, where handlers pick
/// it up with `Extension<User>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use obras_shared::models::user::User;

use crate::{app::AppState, error::ApiError};

/// Rejects the request with 401 unless it carries a valid token
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user: User = state.market.verify_token(header).await?;

    tracing::debug!(user_id = %user.id, role = user.role.as_str(), "Request authenticated");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
