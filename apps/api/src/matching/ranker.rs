//! Match Ranker: pool ranking, single-target scoring and arbitrary-pair scoring.
//!
//! Pool ranking: search filter → score every remaining candidate → minimum-score
//! threshold → sort by score descending, ties by ascending user id.
//!
//! Scoring is CPU-bound and pure, so pool ranking runs on tokio's blocking pool.

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::filter::CandidateFilter;
use crate::matching::scoring::{compute_match, MatchScore};
use crate::matching::similarity::ProfileFeatures;
use crate::matching::store::ProfileStore;
use crate::models::profile::UserProfile;

/// Minimum-score presets for pool ranking.
///
/// `LowMatch` shares the `0.0` threshold with `All`, so it keeps every
/// candidate. The upper bound it probably intended is not defined anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchFilter {
    #[default]
    All,
    HighMatch,
    MediumMatch,
    LowMatch,
}

impl MatchFilter {
    /// Unknown labels fall back to `All`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("highMatch") => Self::HighMatch,
            Some("mediumMatch") => Self::MediumMatch,
            Some("lowMatch") => Self::LowMatch,
            _ => Self::All,
        }
    }

    pub fn min_score(&self) -> f64 {
        match self {
            Self::All => 0.0,
            Self::HighMatch => 0.8,
            Self::MediumMatch => 0.6,
            Self::LowMatch => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub profile: UserProfile,
    pub score: MatchScore,
}

#[derive(Debug, Clone)]
pub struct PairMatch {
    pub first: UserProfile,
    pub second: UserProfile,
    pub score: MatchScore,
}

// ────────────────────────────────────────────────────────────────────────────
// Pure ranking
// ────────────────────────────────────────────────────────────────────────────

pub fn score_profiles(a: &UserProfile, b: &UserProfile) -> MatchScore {
    compute_match(
        &ProfileFeatures::from_profile(a),
        &ProfileFeatures::from_profile(b),
    )
}

/// Ranks `pool` against `requester`. The requester is skipped if present in the pool.
pub fn rank_candidates(
    requester: &UserProfile,
    pool: Vec<UserProfile>,
    search: Option<&str>,
    filter: MatchFilter,
) -> Vec<RankedMatch> {
    let requester_features = ProfileFeatures::from_profile(requester);
    let min_score = filter.min_score();

    let scored: Vec<RankedMatch> = CandidateFilter::new(search)
        .apply(pool)
        .into_iter()
        .filter(|candidate| candidate.id != requester.id)
        .map(|candidate| {
            let score = compute_match(&requester_features, &ProfileFeatures::from_profile(&candidate));
            debug!("Candidate {} scored {}", candidate.id, score.score);
            RankedMatch {
                profile: candidate,
                score,
            }
        })
        .collect();

    threshold_and_sort(scored, min_score, |m| (m.score.score, m.profile.id))
}

/// Keeps items scoring at least `min_score`, ordered by score descending and
/// then by ascending id. `key` yields each item's `(score, id)`.
pub fn threshold_and_sort<T>(
    items: Vec<T>,
    min_score: f64,
    key: impl Fn(&T) -> (f64, Uuid),
) -> Vec<T> {
    let mut kept: Vec<T> = items.into_iter().filter(|item| key(item).0 >= min_score).collect();
    kept.sort_by(|a, b| {
        let (score_a, id_a) = key(a);
        let (score_b, id_b) = key(b);
        score_b.total_cmp(&score_a).then_with(|| id_a.cmp(&id_b))
    });
    kept
}

// ────────────────────────────────────────────────────────────────────────────
// Store-backed queries
// ────────────────────────────────────────────────────────────────────────────

async fn require_profile(store: &dyn ProfileStore, user_id: Uuid) -> Result<UserProfile, AppError> {
    store
        .fetch_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub async fn rank_pool(
    store: &dyn ProfileStore,
    requester_id: Uuid,
    search: Option<String>,
    filter: MatchFilter,
) -> Result<Vec<RankedMatch>, AppError> {
    let requester = require_profile(store, requester_id).await?;
    let pool = store.fetch_candidates(requester_id).await?;
    let pool_size = pool.len();

    let ranked = tokio::task::spawn_blocking(move || {
        rank_candidates(&requester, pool, search.as_deref(), filter)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking task failed: {e}")))?;

    info!(
        "Ranked {} of {} candidates for user {requester_id} (filter: {:?})",
        ranked.len(),
        pool_size,
        filter
    );
    Ok(ranked)
}

pub async fn score_target(
    store: &dyn ProfileStore,
    requester_id: Uuid,
    target_id: Uuid,
) -> Result<RankedMatch, AppError> {
    let requester = require_profile(store, requester_id).await?;
    let target = require_profile(store, target_id).await?;
    let score = score_profiles(&requester, &target);
    Ok(RankedMatch {
        profile: target,
        score,
    })
}

pub async fn score_pair(
    store: &dyn ProfileStore,
    first_id: Uuid,
    second_id: Uuid,
) -> Result<PairMatch, AppError> {
    let first = require_profile(store, first_id).await?;
    let second = require_profile(store, second_id).await?;
    let score = score_profiles(&first, &second);
    Ok(PairMatch {
        first,
        second,
        score,
    })
}
