use super::{ApplicationId, CompanyId, JobId, NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationStatus,
    NewApplicant,
    JobAlert,
    CompanyUpdate,
    System,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::ApplicationStatus => "application_status",
            NotificationKind::NewApplicant => "new_applicant",
            NotificationKind::JobAlert => "job_alert",
            NotificationKind::CompanyUpdate => "company_update",
            NotificationKind::System => "system",
        }
    }
}

/// Write-once record created as a lifecycle side effect; only the read flag
/// is mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_job: Option<JobId>,
    pub related_application: Option<ApplicationId>,
    pub related_company: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            is_read: false,
            read_at: None,
            related_job: None,
            related_application: None,
            related_company: None,
            created_at: Utc::now(),
        }
    }

    pub fn about_job(mut self, job: JobId) -> Self {
        self.related_job = Some(job);
        self
    }

    pub fn about_application(mut self, application: ApplicationId) -> Self {
        self.related_application = Some(application);
        self
    }

    pub fn about_company(mut self, company: CompanyId) -> Self {
        self.related_company = Some(company);
        self
    }
}
