use crate::models::profile::UserProfile;

/// Case-insensitive substring search over a candidate's profile fields.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    needle: Option<String>,
}

impl CandidateFilter {
    /// A blank or absent term matches everyone.
    pub fn new(search: Option<&str>) -> Self {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    pub fn matches(&self, profile: &UserProfile) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        let hit = |field: &str| field.to_lowercase().contains(needle);

        let own_fields = [
            Some(profile.first_name.as_str()),
            Some(profile.last_name.as_str()),
            Some(profile.email.as_str()),
            profile.address.as_deref(),
            profile.bio.as_deref(),
            profile.about.as_deref(),
        ];

        own_fields.into_iter().flatten().any(hit)
            || profile.skills().iter().any(|s| hit(&s.value))
            || profile
                .experiences()
                .iter()
                .any(|e| hit(&e.job_title) || hit(&e.company_name))
    }

    pub fn apply(&self, pool: Vec<UserProfile>) -> Vec<UserProfile> {
        if !self.is_active() {
            return pool;
        }
        pool.into_iter().filter(|p| self.matches(p)).collect()
    }
}
