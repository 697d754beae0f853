//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranker::{rank_pool, score_pair, score_target, MatchFilter, RankedMatch};
use crate::matching::scoring::MatchBreakdown;
use crate::models::user::UserView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub requester_id: Uuid,
    pub search: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequesterQuery {
    pub requester_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchedUser {
    pub user: UserView,
    pub match_score: f64,
    pub match_percentage: f64,
}

impl From<&RankedMatch> for MatchedUser {
    fn from(m: &RankedMatch) -> Self {
        Self {
            user: UserView::from(&m.profile),
            match_score: m.score.score,
            match_percentage: m.score.percentage(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankResponse {
    pub users: Vec<MatchedUser>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TargetMatchResponse {
    pub user: UserView,
    pub match_score: f64,
    pub match_percentage: f64,
    pub breakdown: MatchBreakdown,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    pub user1: UserView,
    pub user2: UserView,
    pub match_score: f64,
    pub match_percentage: f64,
    pub breakdown: MatchBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/matching/users
///
/// Ranks every other user against the requester, optionally narrowed by a
/// free-text search and a minimum-score filter.
pub async fn handle_rank_users(
    State(state): State<AppState>,
    Query(params): Query<RankQuery>,
) -> Result<Json<RankResponse>, AppError> {
    let filter = MatchFilter::from_label(params.filter.as_deref());
    let ranked = rank_pool(
        state.profiles.as_ref(),
        params.requester_id,
        params.search,
        filter,
    )
    .await?;

    Ok(Json(RankResponse {
        users: ranked.iter().map(MatchedUser::from).collect(),
    }))
}

/// GET /api/v1/matching/calculate/:user_id
pub async fn handle_calculate_match(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RequesterQuery>,
) -> Result<Json<TargetMatchResponse>, AppError> {
    let m = score_target(state.profiles.as_ref(), params.requester_id, user_id).await?;

    Ok(Json(TargetMatchResponse {
        user: UserView::from(&m.profile),
        match_score: m.score.score,
        match_percentage: m.score.percentage(),
        breakdown: m.score.breakdown,
    }))
}

/// GET /api/v1/matching/compatibility/:user_id/:other_user_id
///
/// Symmetric: swapping the two ids yields the same score.
pub async fn handle_compatibility(
    State(state): State<AppState>,
    Path((user_id, other_user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompatibilityResponse>, AppError> {
    let pair = score_pair(state.profiles.as_ref(), user_id, other_user_id).await?;

    Ok(Json(CompatibilityResponse {
        user1: UserView::from(&pair.first),
        user2: UserView::from(&pair.second),
        match_score: pair.score.score,
        match_percentage: pair.score.percentage(),
        breakdown: pair.score.breakdown,
    }))
}
