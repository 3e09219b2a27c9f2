use super::{CompanyId, JobId, ReportId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

/// What a report points at. Serialized as a `target_type`/`target_id` pair
/// so the wire shape carries both in one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "snake_case")]
pub enum ReportTarget {
    User(UserId),
    Job(JobId),
    Company(CompanyId),
}

impl ReportTarget {
    pub const fn kind(self) -> &'static str {
        match self {
            ReportTarget::User(_) => "user",
            ReportTarget::Job(_) => "job",
            ReportTarget::Company(_) => "company",
        }
    }
}

/// A complaint filed by any authenticated user against a user, job, or
/// company; admins triage it out of `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub reporter: UserId,
    #[serde(flatten)]
    pub target: ReportTarget,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub action_taken: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn new(
        reporter: UserId,
        target: ReportTarget,
        reason: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReportId::generate(),
            reporter,
            target,
            reason: reason.into(),
            description,
            status: ReportStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            action_taken: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp the reviewing admin alongside the status change.
    pub fn review(&mut self, admin: UserId, status: ReportStatus, action_taken: Option<String>) {
        let now = Utc::now();
        self.status = status;
        self.action_taken = action_taken;
        self.reviewed_by = Some(admin);
        self.reviewed_at = Some(now);
        self.updated_at = now;
    }
}
