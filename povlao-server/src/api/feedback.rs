//! Feedback submission

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use povlao_common::api::types::{FeedbackSubmission, SuccessResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const FIELDS_REQUIRED: &str = "Category and message are required";

/// POST /feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        // Well-formed JSON with missing or mistyped fields
        Err(JsonRejection::JsonDataError(_)) => {
            return Err(ApiError::BadRequest(FIELDS_REQUIRED.to_string()))
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let category = submission.category.trim();
    let message = submission.message.trim();
    if category.is_empty() || message.is_empty() {
        return Err(ApiError::BadRequest(FIELDS_REQUIRED.to_string()));
    }

    state.feedback.append(category, message).await?;
    Ok(Json(SuccessResponse { success: true }))
}
