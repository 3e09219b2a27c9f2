use super::{CompanyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor roles. Admins are provisioned by the `seed-admin` script, never
/// through registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "job_seeker" => Some(Role::JobSeeker),
            "employer" => Some(Role::Employer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Per-user notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub email_notifications: bool,
    pub job_alerts: bool,
    pub profile_public: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            job_alerts: true,
            profile_public: true,
        }
    }
}

/// A registered account. The password digest never leaves the store layer;
/// API views are built from the remaining fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_digest: String,
    pub role: Role,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    /// Opaque resume ids; the blob store holding the bytes is out of scope.
    pub resume_ids: Vec<String>,
    pub settings: UserSettings,
    /// Employers reference their single owned company once created.
    pub company: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(email: String, password_digest: String, role: Role, name: &str) -> Self {
        let mut parts = name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            email,
            password_digest,
            role,
            is_active: true,
            first_name,
            last_name,
            phone: None,
            location: None,
            summary: None,
            skills: Vec::new(),
            resume_ids: Vec::new(),
            settings: UserSettings::default(),
            company: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_splits_name_into_first_and_last() {
        let user = UserRecord::new(
            "ana@example.com".to_string(),
            "digest".to_string(),
            Role::JobSeeker,
            "Ana Maria Silva",
        );
        assert_eq!(user.first_name, "Ana");
        assert_eq!(user.last_name, "Maria Silva");
        assert_eq!(user.full_name(), "Ana Maria Silva");
        assert!(user.is_active);
    }

    #[test]
    fn full_name_trims_when_last_name_empty() {
        let user = UserRecord::new(
            "bo@example.com".to_string(),
            "digest".to_string(),
            Role::Employer,
            "Bo",
        );
        assert_eq!(user.full_name(), "Bo");
    }
}
