use serde::{Deserialize, Serialize};

use crate::matching::similarity::{
    answer_similarity, experience_similarity, profile_completion_similarity, skill_similarity,
    ProfileFeatures,
};
use crate::models::profile::round_to;

#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub answers: f64,
    pub skills: f64,
    pub experience: f64,
    pub completion: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.answers + self.skills + self.experience + self.completion
    }
}

pub const MATCH_WEIGHTS: MatchWeights = MatchWeights {
    answers: 0.4,
    skills: 0.3,
    experience: 0.2,
    completion: 0.1,
};

const SCORE_DECIMALS: i32 = 4;
const PERCENTAGE_DECIMALS: i32 = 2;

/// Unrounded component similarities behind a match score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub answer_similarity: f64,
    pub skill_similarity: f64,
    pub experience_similarity: f64,
    pub profile_completion_similarity: f64,
}

impl MatchBreakdown {
    pub fn between(a: &ProfileFeatures, b: &ProfileFeatures) -> Self {
        Self {
            answer_similarity: answer_similarity(a, b),
            skill_similarity: skill_similarity(a, b),
            experience_similarity: experience_similarity(a, b),
            profile_completion_similarity: profile_completion_similarity(a, b),
        }
    }

    /// Weighted sum rounded to 4 decimals.
    pub fn score(&self) -> f64 {
        let w = MATCH_WEIGHTS;
        debug_assert!((w.sum() - 1.0).abs() < 1e-9, "match weights must sum to 1.0");
        let raw = w.answers * self.answer_similarity
            + w.skills * self.skill_similarity
            + w.experience * self.experience_similarity
            + w.completion * self.profile_completion_similarity;
        round_to(raw.clamp(0.0, 1.0), SCORE_DECIMALS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub score: f64,
    pub breakdown: MatchBreakdown,
}

impl MatchScore {
    pub fn percentage(&self) -> f64 {
        match_percentage(self.score)
    }
}

pub fn compute_match(a: &ProfileFeatures, b: &ProfileFeatures) -> MatchScore {
    let breakdown = MatchBreakdown::between(a, b);
    MatchScore {
        score: breakdown.score(),
        breakdown,
    }
}

pub fn match_percentage(score: f64) -> f64 {
    round_to(score * 100.0, PERCENTAGE_DECIMALS)
}
