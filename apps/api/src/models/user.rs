use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::profile::{EmploymentStatus, SkillCategory, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub employment_status: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub value: String,
    pub category: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Response views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillView {
    pub value: String,
    pub category: SkillCategory,
    pub rating: u8,
    pub proficiency_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceView {
    pub job_title: String,
    pub company_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_current: bool,
    pub duration_in_months: u32,
    pub duration_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerView {
    pub question_id: Uuid,
    pub answer_text: String,
}

/// Public shape of a user in matching responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub about: Option<String>,
    pub profile_completion_percentage: f64,
    pub has_answered_questions: bool,
    pub has_skills: bool,
    pub has_experience: bool,
    pub skills: Vec<SkillView>,
    pub experiences: Vec<ExperienceView>,
    pub answers: Vec<AnswerView>,
}

impl From<&UserProfile> for UserView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            full_name: profile.full_name(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            bio: profile.bio.clone(),
            employment_status: profile.employment_status,
            about: profile.about.clone(),
            profile_completion_percentage: profile.profile_completion_percentage(),
            has_answered_questions: profile.has_answered_questions(),
            has_skills: profile.has_skills(),
            has_experience: profile.has_experience(),
            skills: profile
                .skills()
                .iter()
                .map(|s| SkillView {
                    value: s.value.clone(),
                    category: s.category,
                    rating: s.rating(),
                    proficiency_level: s.proficiency_level().to_string(),
                })
                .collect(),
            experiences: profile
                .experiences()
                .iter()
                .map(|e| ExperienceView {
                    job_title: e.job_title.clone(),
                    company_name: e.company_name.clone(),
                    start_date: e.start_date(),
                    end_date: e.end_date(),
                    description: e.description.clone(),
                    is_current: e.is_current(),
                    duration_in_months: e.duration_in_months(),
                    duration_text: e.duration_text(),
                })
                .collect(),
            answers: profile
                .answers()
                .iter()
                .map(|a| AnswerView {
                    question_id: a.question_id,
                    answer_text: a.text.clone(),
                })
                .collect(),
        }
    }
}
