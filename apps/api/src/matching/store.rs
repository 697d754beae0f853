//! Profile snapshot sources.
//!
//! `AppState` holds an `Arc<dyn ProfileStore>`. The Postgres store is used in
//! production; the in-memory store backs unit and router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{
    Answer, EmploymentStatus, Experience, Skill, SkillCategory, UserProfile,
};
use crate::models::user::{AnswerRow, ExperienceRow, SkillRow, UserRow};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns `None` when the user does not exist.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError>;

    /// Every profile except the requester's.
    async fn fetch_candidates(&self, requester_id: Uuid) -> Result<Vec<UserProfile>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<Uuid, UserProfile>,
}

#[cfg(test)]
impl InMemoryProfileStore {
    pub fn new(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(&user_id).cloned())
    }

    async fn fetch_candidates(&self, requester_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        Ok(self
            .profiles
            .values()
            .filter(|p| p.id != requester_id)
            .cloned()
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL store
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads owned collections for `users` in three round trips and assembles snapshots.
    async fn assemble(&self, users: Vec<UserRow>) -> Result<Vec<UserProfile>, AppError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let skills = sqlx::query_as::<_, SkillRow>(
            "SELECT id, user_id, value, category, rating FROM skills WHERE user_id = ANY($1) ORDER BY id",
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let experiences = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, user_id, job_title, company_name, start_date, end_date, description
            FROM experiences
            WHERE user_id = ANY($1)
            ORDER BY start_date DESC, id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let answers = sqlx::query_as::<_, AnswerRow>(
            "SELECT id, user_id, question_id, answer_text FROM answers WHERE user_id = ANY($1) ORDER BY id",
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Loaded {} skills, {} experiences, {} answers for {} users",
            skills.len(),
            experiences.len(),
            answers.len(),
            users.len()
        );

        let mut skills_by_user = group_by_user(skills, |r| r.user_id);
        let mut experiences_by_user = group_by_user(experiences, |r| r.user_id);
        let mut answers_by_user = group_by_user(answers, |r| r.user_id);

        users
            .into_iter()
            .map(|user| {
                let id = user.id;
                build_profile(
                    user,
                    skills_by_user.remove(&id).unwrap_or_default(),
                    experiences_by_user.remove(&id).unwrap_or_default(),
                    answers_by_user.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, phone, address, bio,
                   employment_status, about
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };
        Ok(self.assemble(vec![user]).await?.into_iter().next())
    }

    async fn fetch_candidates(&self, requester_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        let users = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, phone, address, bio,
                   employment_status, about
            FROM users
            WHERE id <> $1
            ORDER BY id
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        self.assemble(users).await
    }
}

fn group_by_user<T>(rows: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Converts rows into a validated snapshot.
///
/// Rows with an unknown skill category are dropped with a warning; an
/// out-of-range rating, inverted date range or duplicate answer means the
/// CRUD layer let through corrupt data and the request fails.
fn build_profile(
    user: UserRow,
    skills: Vec<SkillRow>,
    experiences: Vec<ExperienceRow>,
    answers: Vec<AnswerRow>,
) -> Result<UserProfile, AppError> {
    let employment_status = match user.employment_status.as_deref() {
        None => None,
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => {
            let parsed = EmploymentStatus::parse(raw);
            if parsed.is_none() {
                warn!("User {} has unknown employment_status '{raw}'", user.id);
            }
            parsed
        }
    };

    let skills = skills
        .into_iter()
        .filter_map(|row| match SkillCategory::parse(&row.category) {
            Some(category) => Some((row, category)),
            None => {
                warn!("Dropping skill {} with unknown category '{}'", row.id, row.category);
                None
            }
        })
        .map(|(row, category)| {
            let rating = u8::try_from(row.rating).unwrap_or(0);
            Skill::new(row.value, category, rating).map_err(|e| corrupt(user.id, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let experiences = experiences
        .into_iter()
        .map(|row| {
            Experience::new(row.job_title, row.company_name, row.start_date, row.end_date)
                .map(|e| e.with_description(row.description))
                .map_err(|e| corrupt(user.id, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let answers = answers
        .into_iter()
        .map(|row| Answer {
            question_id: row.question_id,
            text: row.answer_text,
        })
        .collect();

    let mut profile = UserProfile::new(user.id, user.email, user.first_name, user.last_name)
        .with_skills(skills)
        .with_experiences(experiences)
        .with_answers(answers)
        .map_err(|e| corrupt(user.id, e))?;
    profile.phone = user.phone;
    profile.address = user.address;
    profile.bio = user.bio;
    profile.employment_status = employment_status;
    profile.about = user.about;
    Ok(profile)
}

fn corrupt(user_id: Uuid, err: AppError) -> AppError {
    AppError::Internal(anyhow::anyhow!("Corrupt profile data for user {user_id}: {err}"))
}
