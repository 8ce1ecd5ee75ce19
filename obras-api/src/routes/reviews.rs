/// Review endpoint
///
/// ```text
/// POST /api/reviews
///
/// { "project_id": "uuid", "rating": 5, "comment": "Excelente trabalho" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Project not completed
/// - `403 Forbidden`: Caller is not a participant
/// - `404 Not Found`: Unknown project
/// - `409 Conflict`: Already reviewed
/// - `422 Unprocessable Entity`: Rating outside 1-5

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use obras_shared::models::{
    review::{ReviewView, SubmitReview},
    user::User,
};

pub async fn submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<SubmitReview>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ReviewView>)> {
    let Json(input) = payload?;
    let review = state.market.submit_review(&user, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
