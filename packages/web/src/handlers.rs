use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use dreamtales_story::safety::SafetyResult;
use dreamtales_story::{word_target_for, StoryLength, StoryRecord, StoryRequest, WordTarget};

use crate::error::ApiError;
use crate::models::{ModerateRequest, ModerateResponse, PaginatedResponse};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub async fn create_story(
    State(state): State<AppState>,
    Json(request): Json<StoryRequest>,
) -> Result<(StatusCode, Json<StoryRecord>), ApiError> {
    let record = state.service.create_story(&request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Deserialize)]
pub struct StoriesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_stories(
    State(state): State<AppState>,
    Query(params): Query<StoriesQuery>,
) -> Result<Json<PaginatedResponse<StoryRecord>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let (data, total) = state.service.list_stories(limit, offset).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoryRecord>, ApiError> {
    state
        .service
        .get_story(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("story {id} not found")))
}

pub async fn moderate(
    State(state): State<AppState>,
    Json(request): Json<ModerateRequest>,
) -> Json<ModerateResponse> {
    let response = match state.service.moderate(&request.text, request.language) {
        SafetyResult::Pass => ModerateResponse {
            ok: true,
            reason: None,
        },
        SafetyResult::Rejected { reason } => ModerateResponse {
            ok: false,
            reason: Some(reason),
        },
    };
    Json(response)
}

pub async fn word_target(Path(length): Path<String>) -> Result<Json<WordTarget>, ApiError> {
    let length = StoryLength::from_str(&length).map_err(|_| {
        ApiError::BadRequest(format!(
            "unknown story length '{length}', expected short, medium or long"
        ))
    })?;
    Ok(Json(word_target_for(length)))
}
