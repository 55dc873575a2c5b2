//! Leaderboard endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use povlao_common::api::types::{LeaderboardEntry, SuccessResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /leaderboard
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(state.leaderboard.entries().await?))
}

/// POST /leaderboard
pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(body) = payload?;

    let username = body
        .get("username")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|u| !u.is_empty());
    let score = match body.get("score") {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    };

    let (Some(username), Some(score)) = (username, score) else {
        return Err(ApiError::BadRequest("Invalid username or score".to_string()));
    };

    state.leaderboard.submit(username, score).await?;
    Ok(Json(SuccessResponse { success: true }))
}
