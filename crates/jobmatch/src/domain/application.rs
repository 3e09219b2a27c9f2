use super::{ApplicationId, JobId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review-pipeline state of an application.
///
/// `Pending` is the initial state. `Rejected`, `Accepted`, and `Withdrawn`
/// are terminal. `Withdrawn` is reachable only through the seeker-facing
/// withdraw operation, and only from `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Shortlisted,
    Interviewed,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ApplicationStatus::Pending),
            "reviewing" => Some(ApplicationStatus::Reviewing),
            "shortlisted" => Some(ApplicationStatus::Shortlisted),
            "interviewed" => Some(ApplicationStatus::Interviewed),
            "rejected" => Some(ApplicationStatus::Rejected),
            "accepted" => Some(ApplicationStatus::Accepted),
            "withdrawn" => Some(ApplicationStatus::Withdrawn),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Accepted | ApplicationStatus::Withdrawn
        )
    }

    /// Whether an employer status update from `self` to `next` is legal.
    ///
    /// Terminal states admit no further updates, `Pending` cannot be
    /// re-entered, and `Withdrawn` is never a legal update target. Within
    /// the review pipeline movement is otherwise unrestricted, including
    /// backwards (e.g. `Shortlisted` back to `Reviewing`).
    pub fn allows_update_to(self, next: ApplicationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        !matches!(
            next,
            ApplicationStatus::Pending | ApplicationStatus::Withdrawn
        ) && next != self
    }
}

/// One seeker's application to one job. At most one record may exist per
/// (job, seeker) pair; the store enforces that as a real constraint, not a
/// pre-check, so concurrent applies race safely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job: JobId,
    pub job_seeker: UserId,
    /// Denormalized from the job at apply time so employer-side queries
    /// need no join.
    pub employer: UserId,
    pub resume_id: Option<String>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_status_at: Option<DateTime<Utc>>,
    pub employer_notes: Option<String>,
}

impl ApplicationRecord {
    pub fn new(
        job: JobId,
        job_seeker: UserId,
        employer: UserId,
        resume_id: Option<String>,
        cover_letter: Option<String>,
    ) -> Self {
        Self {
            id: ApplicationId::generate(),
            job,
            job_seeker,
            employer,
            resume_id,
            cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            reviewed_at: None,
            updated_status_at: None,
            employer_notes: None,
        }
    }

    /// Withdrawn applications do not count toward `Job.total_applications`.
    pub fn counts_toward_total(&self) -> bool {
        self.status != ApplicationStatus::Withdrawn
    }
}
