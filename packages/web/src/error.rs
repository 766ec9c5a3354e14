use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use dreamtales_story::StoryError;

/// Error returned by API handlers, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Story(StoryError),
    NotFound(String),
    BadRequest(String),
}

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        ApiError::Story(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Story(err) => story_error_response(err),
        };

        (status, Json(body)).into_response()
    }
}

fn story_error_response(err: StoryError) -> (StatusCode, serde_json::Value) {
    match err {
        StoryError::InvalidInput(message) => {
            (StatusCode::BAD_REQUEST, json!({ "error": message }))
        }
        StoryError::Conflict(message) => {
            tracing::error!(error = %message, "story conflict");
            (StatusCode::CONFLICT, json!({ "error": message }))
        }
        StoryError::PromptRejected { reason } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": "prompt rejected", "reason": reason }),
        ),
        StoryError::UnsafeOutput { reason, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": "could not generate a safe story, please try another idea", "reason": reason }),
        ),
        err @ (StoryError::LlmApiRequest(_)
        | StoryError::LlmApiError { .. }
        | StoryError::LlmResponseParse(_)
        | StoryError::LlmEmptyResponse) => {
            tracing::error!(error = %err, "story generation failed");
            (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "story generation failed" }),
            )
        }
        err => {
            tracing::error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal error" }),
            )
        }
    }
}
