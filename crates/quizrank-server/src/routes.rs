//! HTTP binding of the leaderboard operations.
//!
//! Authentication happens upstream: the gateway verifies the bearer token and
//! forwards the caller's user id in [`CALLER_HEADER`]. Handlers only compare
//! that id against the path for operations restricted to one's own account.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use quizrank_core::leaderboard::{
    LeaderboardOverview, ProfiledNeighbor, Score, ScoreLookup,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{error::ApiError, state::AppState};

pub const CALLER_HEADER: &str = "x-user-id";

pub const DEFAULT_TOP: u64 = 10;
pub const MAX_TOP: u64 = 100;
pub const DEFAULT_RANGE_SIZE: u64 = 5;
pub const MAX_RANGE_SIZE: u64 = 20;

#[derive(Deserialize)]
pub struct TopParams {
    top: Option<u64>,
}

#[derive(Deserialize)]
pub struct AroundParams {
    range_size: Option<u64>,
}

#[derive(Deserialize)]
pub struct ScoreUpdate {
    score: Score,
    user_data: Option<Map<String, Value>>,
}

#[derive(Serialize)]
pub struct UserScore {
    user_id: String,
    display_key: String,
    score: Score,
    rank: u64,
}

fn caller_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn require_owner(headers: &HeaderMap, user_id: &str, action: &'static str) -> Result<(), ApiError> {
    match caller_id(headers) {
        None => Err(ApiError::Unauthorized),
        Some(caller) if caller != user_id => Err(ApiError::Forbidden(action)),
        Some(_) => Ok(()),
    }
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))
}

fn bounded(value: Option<u64>, default: u64, max: u64, name: &str) -> Result<u64, ApiError> {
    let value = value.unwrap_or(default);
    if !(1..=max).contains(&value) {
        return Err(ApiError::MalformedPayload(format!(
            "{} must be between 1 and {}",
            name, max
        )));
    }
    Ok(value)
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Result<Json<LeaderboardOverview>, ApiError> {
    let params = query(params)?;
    let top = bounded(params.top, DEFAULT_TOP, MAX_TOP, "top")?;

    let overview = state
        .leaderboard
        .get_overview(top, caller_id(&headers))
        .await?;

    Ok(Json(overview))
}

pub async fn user_score_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserScore>, ApiError> {
    match state.leaderboard.get_score_and_rank(&user_id).await? {
        ScoreLookup::Ranked {
            display_key,
            score,
            rank,
        } => Ok(Json(UserScore {
            user_id,
            display_key,
            score,
            rank,
        })),
        ScoreLookup::NotRanked { .. } => Err(ApiError::NotFound(
            "User not found in leaderboard".to_string(),
        )),
        ScoreLookup::IdentityNotFound => Err(ApiError::NotFound("User not found".to_string())),
    }
}

pub async fn around_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    params: Result<Query<AroundParams>, QueryRejection>,
) -> Result<Json<Vec<ProfiledNeighbor>>, ApiError> {
    let params = query(params)?;
    let range_size = bounded(
        params.range_size,
        DEFAULT_RANGE_SIZE,
        MAX_RANGE_SIZE,
        "range_size",
    )?;

    state
        .leaderboard
        .get_neighbors(&user_id, range_size)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn submit_score_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    update: Result<Json<ScoreUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_owner(&headers, &user_id, "You can only update your own score")?;
    let Json(update) =
        update.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;

    state
        .leaderboard
        .submit_score(&user_id, update.score, update.user_data)
        .await?;

    Ok(Json(json!({ "message": "Score updated successfully" })))
}

pub async fn remove_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_owner(
        &headers,
        &user_id,
        "You can only remove your own account from leaderboard",
    )?;

    if !state.leaderboard.remove_user(&user_id).await? {
        return Err(ApiError::NotFound(
            "User not found in leaderboard".to_string(),
        ));
    }

    Ok(Json(
        json!({ "message": "User removed from leaderboard successfully" }),
    ))
}

pub async fn clear_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if caller_id(&headers).is_none() {
        return Err(ApiError::Unauthorized);
    }

    state.leaderboard.clear_leaderboard().await?;

    Ok(Json(json!({ "message": "Leaderboard cleared successfully" })))
}
