use super::{CompanyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state set by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

/// Employer-editable company attributes, separated from the record so
/// create/update payloads share one validated shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A company owned by exactly one employer. `total_jobs` and
/// `total_followers` are denormalized counters maintained by the lifecycle
/// engine and repaired by the reconciliation pass; they can drift between
/// passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub employer: UserId,
    pub profile: CompanyProfile,
    pub verification: VerificationStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub total_jobs: i64,
    pub total_followers: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord {
    pub fn new(employer: UserId, profile: CompanyProfile) -> Self {
        let now = Utc::now();
        Self {
            id: CompanyId::generate(),
            employer,
            profile,
            verification: VerificationStatus::Pending,
            verified_at: None,
            total_jobs: 0,
            total_followers: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verification == VerificationStatus::Verified
    }
}
