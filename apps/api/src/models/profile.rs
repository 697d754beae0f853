use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
    Freelancer,
    Student,
    Retired,
}

impl EmploymentStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "employed" => Some(Self::Employed),
            "unemployed" => Some(Self::Unemployed),
            "freelancer" => Some(Self::Freelancer),
            "student" => Some(Self::Student),
            "retired" => Some(Self::Retired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Design,
    Marketing,
    Business,
    SoftSkills,
    Languages,
    Tools,
    Frameworks,
    Databases,
}

impl SkillCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "programming" => Some(Self::Programming),
            "design" => Some(Self::Design),
            "marketing" => Some(Self::Marketing),
            "business" => Some(Self::Business),
            "soft_skills" => Some(Self::SoftSkills),
            "languages" => Some(Self::Languages),
            "tools" => Some(Self::Tools),
            "frameworks" => Some(Self::Frameworks),
            "databases" => Some(Self::Databases),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::Design => "design",
            Self::Marketing => "marketing",
            Self::Business => "business",
            Self::SoftSkills => "soft_skills",
            Self::Languages => "languages",
            Self::Tools => "tools",
            Self::Frameworks => "frameworks",
            Self::Databases => "databases",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub value: String,
    pub category: SkillCategory,
    rating: u8,
}

impl Skill {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    pub fn new(value: impl Into<String>, category: SkillCategory, rating: u8) -> Result<Self, AppError> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(AppError::Validation(format!(
                "skill rating must be between {} and {}, got {rating}",
                Self::MIN_RATING,
                Self::MAX_RATING
            )));
        }
        Ok(Self {
            value: value.into(),
            category,
            rating,
        })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn proficiency_level(&self) -> &'static str {
        match self.rating {
            1 => "Beginner",
            2 => "Elementary",
            3 => "Intermediate",
            4 => "Advanced",
            _ => "Expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub job_title: String,
    pub company_name: String,
    pub description: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl Experience {
    /// Rejects an `end_date` that is not strictly after `start_date`.
    pub fn new(
        job_title: impl Into<String>,
        company_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, AppError> {
        if let Some(end) = end_date {
            if end <= start_date {
                return Err(AppError::Validation(format!(
                    "experience end_date {end} must be after start_date {start_date}"
                )));
            }
        }
        Ok(Self {
            job_title: job_title.into(),
            company_name: company_name.into(),
            description: None,
            start_date,
            end_date,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn duration_in_months(&self) -> u32 {
        self.duration_in_months_at(Utc::now().date_naive())
    }

    /// Whole calendar months from the start month to the end month (or `today`).
    pub fn duration_in_months_at(&self, today: NaiveDate) -> u32 {
        let end = self.end_date.unwrap_or(today);
        let end_months = end.year() * 12 + end.month() as i32;
        let start_months = self.start_date.year() * 12 + self.start_date.month() as i32;
        (end_months - start_months).unsigned_abs()
    }

    pub fn duration_text(&self) -> String {
        format_duration(self.duration_in_months())
    }
}

pub fn format_duration(months: u32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("{n} {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }

    if months < 12 {
        return plural(months, "month");
    }
    let years = months / 12;
    let remaining = months % 12;
    if remaining == 0 {
        plural(years, "year")
    } else {
        format!("{} {}", plural(years, "year"), plural(remaining, "month"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question_id: Uuid,
    pub text: String,
}

/// Immutable profile snapshot consumed by the matching engine.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub about: Option<String>,
    skills: Vec<Skill>,
    experiences: Vec<Experience>,
    answers: Vec<Answer>,
}

const REQUIRED_FIELD_COUNT: usize = 3;
const OPTIONAL_FIELD_COUNT: usize = 5;

impl UserProfile {
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_experiences(mut self, experiences: Vec<Experience>) -> Self {
        self.experiences = experiences;
        self
    }

    /// Rejects a second answer to the same question.
    pub fn with_answers(mut self, answers: Vec<Answer>) -> Result<Self, AppError> {
        let mut seen = HashSet::with_capacity(answers.len());
        for answer in &answers {
            if !seen.insert(answer.question_id) {
                return Err(AppError::Validation(format!(
                    "user {} has more than one answer for question {}",
                    self.id, answer.question_id
                )));
            }
        }
        self.answers = answers;
        Ok(self)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Share of the profile checklist (3 required + 5 optional fields) that is
    /// non-blank, 0–100 rounded to 2 decimals.
    pub fn profile_completion_percentage(&self) -> f64 {
        let required = [
            Some(self.email.as_str()),
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
        ];
        let optional = [
            self.phone.as_deref(),
            self.address.as_deref(),
            self.bio.as_deref(),
            self.employment_status.map(|_| "set"),
            self.about.as_deref(),
        ];

        let completed = required
            .iter()
            .chain(optional.iter())
            .filter(|field| is_present(**field))
            .count();
        let total = REQUIRED_FIELD_COUNT + OPTIONAL_FIELD_COUNT;

        round_to(completed as f64 / total as f64 * 100.0, 2)
    }

    pub fn has_answered_questions(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn has_skills(&self) -> bool {
        !self.skills.is_empty()
    }

    pub fn has_experience(&self) -> bool {
        !self.experiences.is_empty()
    }
}

fn is_present(field: Option<&str>) -> bool {
    field.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete_profile() -> UserProfile {
        let mut p = UserProfile::new(Uuid::new_v4(), "ada@example.com", "Ada", "Lovelace");
        p.phone = Some("+1-555-123-4567".to_string());
        p.address = Some("12 Analytical Way".to_string());
        p.bio = Some("Mathematician".to_string());
        p.employment_status = Some(EmploymentStatus::Employed);
        p.about = Some("Writes the first programs".to_string());
        p
    }

    #[test]
    fn test_completion_full_profile_is_100() {
        assert_eq!(complete_profile().profile_completion_percentage(), 100.0);
    }

    #[test]
    fn test_completion_minimal_profile() {
        let p = UserProfile::new(Uuid::new_v4(), "a@b.c", "Al", "Bo");
        // 3 of 8 fields
        assert_eq!(p.profile_completion_percentage(), 37.5);
    }

    #[test]
    fn test_completion_blank_counts_as_missing() {
        let mut p = UserProfile::new(Uuid::new_v4(), "a@b.c", "Al", "Bo");
        p.bio = Some("   ".to_string());
        p.phone = Some("555".to_string());
        // 4 of 8 fields
        assert_eq!(p.profile_completion_percentage(), 50.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0 * 100.0, 2), 66.67);
        assert_eq!(round_to(4.0 / 6.0, 4), 0.6667);
        assert_eq!(round_to(0.25, 1), 0.3);
    }

    #[test]
    fn test_skill_rating_bounds() {
        assert!(Skill::new("Rust", SkillCategory::Programming, 0).is_err());
        assert!(Skill::new("Rust", SkillCategory::Programming, 6).is_err());
        let s = Skill::new("Rust", SkillCategory::Programming, 5).unwrap();
        assert_eq!(s.rating(), 5);
        assert_eq!(s.proficiency_level(), "Expert");
    }

    #[test]
    fn test_proficiency_levels() {
        let levels: Vec<_> = (1..=5)
            .map(|r| {
                Skill::new("Go", SkillCategory::Programming, r)
                    .unwrap()
                    .proficiency_level()
            })
            .collect();
        assert_eq!(
            levels,
            vec!["Beginner", "Elementary", "Intermediate", "Advanced", "Expert"]
        );
    }

    #[test]
    fn test_experience_end_must_follow_start() {
        let start = date(2020, 1, 1);
        assert!(Experience::new("Engineer", "Acme", start, Some(start)).is_err());
        assert!(Experience::new("Engineer", "Acme", start, Some(date(2019, 12, 31))).is_err());
        assert!(Experience::new("Engineer", "Acme", start, Some(date(2020, 1, 2))).is_ok());
        assert!(Experience::new("Engineer", "Acme", start, None).unwrap().is_current());
    }

    #[test]
    fn test_experience_duration() {
        let e = Experience::new("Engineer", "Acme", date(2020, 3, 15), Some(date(2022, 4, 1))).unwrap();
        assert_eq!(e.duration_in_months_at(date(2030, 1, 1)), 25);
        assert_eq!(e.duration_text(), "2 years 1 month");

        let current = Experience::new("Engineer", "Acme", date(2024, 1, 1), None).unwrap();
        assert_eq!(current.duration_in_months_at(date(2024, 7, 20)), 6);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 months");
        assert_eq!(format_duration(1), "1 month");
        assert_eq!(format_duration(11), "11 months");
        assert_eq!(format_duration(12), "1 year");
        assert_eq!(format_duration(24), "2 years");
        assert_eq!(format_duration(27), "2 years 3 months");
    }

    #[test]
    fn test_duplicate_answers_rejected() {
        let q = Uuid::new_v4();
        let answers = vec![
            Answer {
                question_id: q,
                text: "first".to_string(),
            },
            Answer {
                question_id: q,
                text: "second".to_string(),
            },
        ];
        let result = UserProfile::new(Uuid::new_v4(), "a@b.c", "Al", "Bo").with_answers(answers);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_full_name_and_flags() {
        let p = complete_profile();
        assert_eq!(p.full_name(), "Ada Lovelace");
        assert!(!p.has_skills());
        assert!(!p.has_experience());
        assert!(!p.has_answered_questions());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(EmploymentStatus::parse("student"), Some(EmploymentStatus::Student));
        assert_eq!(EmploymentStatus::parse("astronaut"), None);
        assert_eq!(SkillCategory::parse("soft_skills"), Some(SkillCategory::SoftSkills));
        assert_eq!(SkillCategory::Databases.as_str(), "databases");
        assert_eq!(SkillCategory::parse("cooking"), None);
    }
}
