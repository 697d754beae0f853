//! Set-similarity metrics between two profiles.
//!
//! Every metric is symmetric and bounded to `[0, 1]`. An empty collection on
//! either side resolves the metric to `0.0` instead of failing.
//!
//! Profiles are first reduced to [`ProfileFeatures`] so a pool request
//! tokenizes the requester once rather than once per candidate.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use uuid::Uuid;

use crate::models::profile::{SkillCategory, UserProfile};

/// Pre-tokenized view of a profile. Owned, so it can cross thread boundaries.
#[derive(Debug, Clone, Default)]
pub struct ProfileFeatures {
    pub answer_tokens: HashMap<Uuid, HashSet<String>>,
    pub skill_pairs: HashSet<(String, SkillCategory)>,
    pub job_titles: HashSet<String>,
    pub company_names: HashSet<String>,
    /// Completion percentage / 100.
    pub completion: f64,
}

impl ProfileFeatures {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let answer_tokens = profile
            .answers()
            .iter()
            .map(|a| (a.question_id, tokenize(&a.text)))
            .collect();

        let skill_pairs = profile
            .skills()
            .iter()
            .map(|s| (s.value.clone(), s.category))
            .collect();

        let job_titles = profile
            .experiences()
            .iter()
            .map(|e| e.job_title.clone())
            .collect();

        let company_names = profile
            .experiences()
            .iter()
            .map(|e| e.company_name.clone())
            .collect();

        Self {
            answer_tokens,
            skill_pairs,
            job_titles,
            company_names,
            completion: profile.profile_completion_percentage() / 100.0,
        }
    }

    fn has_experience(&self) -> bool {
        !self.job_titles.is_empty() || !self.company_names.is_empty()
    }
}

/// Lower-cases and splits on runs of non-word characters (anything other than
/// alphanumerics and `_`). Empty fragments are dropped.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `|A ∩ B| / |A ∪ B|`, `0.0` when both sets are empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Mean token-set Jaccard over the questions both users answered.
pub fn answer_similarity(a: &ProfileFeatures, b: &ProfileFeatures) -> f64 {
    if a.answer_tokens.is_empty() || b.answer_tokens.is_empty() {
        return 0.0;
    }

    // Summed in question-id order so (a, b) and (b, a) add identical floats in identical order.
    let mut common: Vec<&Uuid> = a
        .answer_tokens
        .keys()
        .filter(|q| b.answer_tokens.contains_key(*q))
        .collect();
    if common.is_empty() {
        return 0.0;
    }
    common.sort();

    let total: f64 = common
        .iter()
        .map(|q| jaccard(&a.answer_tokens[*q], &b.answer_tokens[*q]))
        .sum();
    total / common.len() as f64
}

/// Jaccard over distinct `(value, category)` pairs.
pub fn skill_similarity(a: &ProfileFeatures, b: &ProfileFeatures) -> f64 {
    if a.skill_pairs.is_empty() || b.skill_pairs.is_empty() {
        return 0.0;
    }
    jaccard(&a.skill_pairs, &b.skill_pairs)
}

/// Mean of job-title Jaccard and company-name Jaccard.
pub fn experience_similarity(a: &ProfileFeatures, b: &ProfileFeatures) -> f64 {
    if !a.has_experience() || !b.has_experience() {
        return 0.0;
    }
    let titles = jaccard(&a.job_titles, &b.job_titles);
    let companies = jaccard(&a.company_names, &b.company_names);
    (titles + companies) / 2.0
}

pub fn profile_completion_similarity(a: &ProfileFeatures, b: &ProfileFeatures) -> f64 {
    (1.0 - (a.completion - b.completion).abs()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{round_to, Answer, Experience, Skill};
    use chrono::NaiveDate;

    fn features_with_answers(answers: &[(Uuid, &str)]) -> ProfileFeatures {
        let profile = UserProfile::new(Uuid::new_v4(), "u@example.com", "First", "Last")
            .with_answers(
                answers
                    .iter()
                    .map(|(q, t)| Answer {
                        question_id: *q,
                        text: t.to_string(),
                    })
                    .collect(),
            )
            .unwrap();
        ProfileFeatures::from_profile(&profile)
    }

    fn features_with_skills(skills: &[(&str, SkillCategory)]) -> ProfileFeatures {
        let profile = UserProfile::new(Uuid::new_v4(), "u@example.com", "First", "Last")
            .with_skills(
                skills
                    .iter()
                    .map(|(v, c)| Skill::new(*v, *c, 3).unwrap())
                    .collect(),
            );
        ProfileFeatures::from_profile(&profile)
    }

    fn features_with_experience(jobs: &[(&str, &str)]) -> ProfileFeatures {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let profile = UserProfile::new(Uuid::new_v4(), "u@example.com", "First", "Last")
            .with_experiences(
                jobs.iter()
                    .map(|(title, company)| Experience::new(*title, *company, start, None).unwrap())
                    .collect(),
            );
        ProfileFeatures::from_profile(&profile)
    }

    #[test]
    fn test_tokenize_collapses_duplicates_and_punctuation() {
        let tokens = tokenize("Rust, rust... and RUST_lang!");
        let expected: HashSet<String> = ["rust", "and", "rust_lang"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_tokenize_drops_leading_separator() {
        assert!(!tokenize("  hello").contains(""));
        assert!(tokenize("!!!").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_accented_letters_inside_words() {
        let tokens = tokenize("Café naïve, CAFÉ");
        let expected: HashSet<String> = ["café", "naïve"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_jaccard_empty_sets_is_zero() {
        let empty: HashSet<u8> = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_answer_similarity_coffee_example() {
        let q = Uuid::new_v4();
        let a = features_with_answers(&[(q, "I love coding and coffee")]);
        let b = features_with_answers(&[(q, "I love coffee and music")]);
        let sim = answer_similarity(&a, &b);
        assert_eq!(round_to(sim, 4), 0.6667);
        assert_eq!(sim, 4.0 / 6.0);
    }

    #[test]
    fn test_answer_similarity_averages_common_questions_only() {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let q_only_a = Uuid::new_v4();
        let a = features_with_answers(&[(q1, "same words"), (q2, "alpha"), (q_only_a, "ignored")]);
        let b = features_with_answers(&[(q1, "same words"), (q2, "beta")]);
        // (1.0 + 0.0) / 2
        assert_eq!(answer_similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_answer_similarity_no_common_questions() {
        let a = features_with_answers(&[(Uuid::new_v4(), "hello there")]);
        let b = features_with_answers(&[(Uuid::new_v4(), "hello there")]);
        assert_eq!(answer_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_answer_similarity_empty_side_is_zero() {
        let q = Uuid::new_v4();
        let a = features_with_answers(&[]);
        let b = features_with_answers(&[(q, "anything at all")]);
        assert_eq!(answer_similarity(&a, &b), 0.0);
        assert_eq!(answer_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_answer_similarity_punctuation_only_answers() {
        let q = Uuid::new_v4();
        let a = features_with_answers(&[(q, "?!?!?")]);
        let b = features_with_answers(&[(q, "...")]);
        assert_eq!(answer_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_skill_similarity_ruby_example() {
        let a = features_with_skills(&[
            ("Ruby", SkillCategory::Programming),
            ("Rails", SkillCategory::Frameworks),
        ]);
        let b = features_with_skills(&[
            ("Ruby", SkillCategory::Programming),
            ("Django", SkillCategory::Frameworks),
        ]);
        assert_eq!(round_to(skill_similarity(&a, &b), 4), 0.3333);
    }

    #[test]
    fn test_skill_similarity_requires_category_match() {
        let a = features_with_skills(&[("Python", SkillCategory::Programming)]);
        let b = features_with_skills(&[("Python", SkillCategory::Tools)]);
        assert_eq!(skill_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_skill_similarity_repeated_pairs_do_not_inflate() {
        let a = features_with_skills(&[
            ("Go", SkillCategory::Programming),
            ("Go", SkillCategory::Programming),
        ]);
        let b = features_with_skills(&[
            ("Go", SkillCategory::Programming),
            ("Sql", SkillCategory::Databases),
        ]);
        assert_eq!(skill_similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_skill_similarity_empty_side_is_zero() {
        let a = features_with_skills(&[]);
        let b = features_with_skills(&[
            ("Rust", SkillCategory::Programming),
            ("Figma", SkillCategory::Design),
            ("Postgres", SkillCategory::Databases),
        ]);
        assert_eq!(skill_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_experience_similarity_mean_of_titles_and_companies() {
        let a = features_with_experience(&[("Software Engineer", "TechCorp")]);
        let b = features_with_experience(&[("Software Engineer", "DataCorp")]);
        // titles 1.0, companies 0.0
        assert_eq!(experience_similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_experience_similarity_empty_side_is_zero() {
        let a = features_with_experience(&[]);
        let b = features_with_experience(&[("CTO", "Initech")]);
        assert_eq!(experience_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_completion_similarity() {
        let mut a = ProfileFeatures::default();
        let mut b = ProfileFeatures::default();
        a.completion = 1.0;
        b.completion = 0.375;
        assert_eq!(profile_completion_similarity(&a, &b), 0.375);
        b.completion = 1.0;
        assert_eq!(profile_completion_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_metrics_are_symmetric() {
        let q = Uuid::new_v4();
        let a = features_with_answers(&[(q, "remote work suits me well")]);
        let b = features_with_answers(&[(q, "I prefer the office, remote is lonely")]);
        assert_eq!(answer_similarity(&a, &b), answer_similarity(&b, &a));

        let a = features_with_skills(&[("Rust", SkillCategory::Programming), ("Docker", SkillCategory::Tools)]);
        let b = features_with_skills(&[("Docker", SkillCategory::Tools)]);
        assert_eq!(skill_similarity(&a, &b), skill_similarity(&b, &a));

        let a = features_with_experience(&[("Designer", "Studio"), ("Lead", "Agency")]);
        let b = features_with_experience(&[("Designer", "Agency")]);
        assert_eq!(experience_similarity(&a, &b), experience_similarity(&b, &a));
    }
}
