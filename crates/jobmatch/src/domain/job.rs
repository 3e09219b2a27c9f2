use super::{CompanyId, JobId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
    Draft,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(JobStatus::Open),
            "closed" => Some(JobStatus::Closed),
            "draft" => Some(JobStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Onsite,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Fulltime,
    Parttime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLocation {
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_remote: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub currency: Option<String>,
    pub is_negotiable: bool,
}

/// Employer-supplied job attributes, shared by the post and update payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    #[serde(default)]
    pub location: JobLocation,
    #[serde(default)]
    pub salary: SalaryRange,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    pub experience_level: Option<ExperienceLevel>,
    pub category: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub status: JobStatus,
    pub deadline: Option<DateTime<Utc>>,
}

/// A posting owned by one employer and one company.
///
/// `total_applications` is the denormalized counter with the precise
/// contract: it tracks the number of non-withdrawn applications for this
/// job, best-effort on the live path, exactly after a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub employer: UserId,
    pub company: CompanyId,
    pub draft: JobDraft,
    pub total_applications: i64,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(employer: UserId, company: CompanyId, draft: JobDraft) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::generate(),
            employer,
            company,
            draft,
            total_applications: 0,
            total_views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.draft.status == JobStatus::Open
    }
}
