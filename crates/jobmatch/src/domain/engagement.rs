//! Ownership-tagged bookmark records: saved jobs, company follows, and job
//! alerts. Each carries a uniqueness rule preventing silent duplicates.

use super::{CompanyId, JobAlertId, JobId, SavedJobId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookmarked job. Unique per (seeker, job) at the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJobRecord {
    pub id: SavedJobId,
    pub job_seeker: UserId,
    pub job: JobId,
    pub saved_at: DateTime<Utc>,
}

impl SavedJobRecord {
    pub fn new(job_seeker: UserId, job: JobId) -> Self {
        Self {
            id: SavedJobId::generate(),
            job_seeker,
            job,
            saved_at: Utc::now(),
        }
    }
}

/// A company follow. Unique per (seeker, company); paired with the
/// `Company.total_followers` counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowRecord {
    pub job_seeker: UserId,
    pub company: CompanyId,
    pub followed_at: DateTime<Utc>,
}

impl FollowRecord {
    pub fn new(job_seeker: UserId, company: CompanyId) -> Self {
        Self {
            job_seeker,
            company,
            followed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFrequency {
    Instant,
    Daily,
    Weekly,
}

/// A saved search a seeker wants to be notified about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAlertRecord {
    pub id: JobAlertId,
    pub job_seeker: UserId,
    pub name: String,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_types: Vec<String>,
    pub salary_min: Option<u64>,
    pub is_active: bool,
    pub frequency: AlertFrequency,
    pub created_at: DateTime<Utc>,
}

impl JobAlertRecord {
    pub fn new(job_seeker: UserId, name: String) -> Self {
        Self {
            id: JobAlertId::generate(),
            job_seeker,
            name,
            keywords: Vec::new(),
            location: None,
            job_types: Vec::new(),
            salary_min: None,
            is_active: true,
            frequency: AlertFrequency::Daily,
            created_at: Utc::now(),
        }
    }
}
