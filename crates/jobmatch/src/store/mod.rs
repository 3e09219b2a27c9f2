//! Storage abstraction over the document store.
//!
//! One trait per collection so services and tests can be exercised against
//! narrow fakes; [`EntityStore`] bundles them for the wired-up application.
//! Uniqueness rules (duplicate application, duplicate follow, duplicate
//! save, duplicate email) are enforced by the implementation at insert
//! time, never by a caller-side pre-check, so concurrent writers race on
//! the constraint rather than on a lookup.

mod memory;

pub use memory::MemoryStore;

use crate::domain::{
    ApplicationId, ApplicationRecord, CompanyId, CompanyRecord, FollowRecord, JobAlertId,
    JobAlertRecord, JobId, JobRecord, NotificationId, NotificationRecord, ReportId, ReportRecord,
    SavedJobId, SavedJobRecord, UserId, UserRecord,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait UserStore: Send + Sync {
    /// Insert a new user; `Conflict` when the email is taken.
    fn insert_user(&self, user: UserRecord) -> Result<(), StoreError>;
    fn user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    fn update_user(&self, user: UserRecord) -> Result<(), StoreError>;
    /// Hard delete; returns the removed record so callers can cascade.
    fn delete_user(&self, id: UserId) -> Result<UserRecord, StoreError>;
    fn users(&self) -> Result<Vec<UserRecord>, StoreError>;
}

pub trait CompanyStore: Send + Sync {
    fn insert_company(&self, company: CompanyRecord) -> Result<(), StoreError>;
    fn company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, StoreError>;
    fn company_by_employer(&self, employer: UserId) -> Result<Option<CompanyRecord>, StoreError>;
    fn update_company(&self, company: CompanyRecord) -> Result<(), StoreError>;
    fn delete_company(&self, id: CompanyId) -> Result<(), StoreError>;
    fn companies(&self) -> Result<Vec<CompanyRecord>, StoreError>;
    /// Atomic counter adjustment; saturates at zero rather than going
    /// negative when decrements outrun the source records.
    fn adjust_total_jobs(&self, id: CompanyId, delta: i64) -> Result<(), StoreError>;
    fn adjust_total_followers(&self, id: CompanyId, delta: i64) -> Result<(), StoreError>;
    fn set_company_counters(
        &self,
        id: CompanyId,
        total_jobs: i64,
        total_followers: i64,
    ) -> Result<(), StoreError>;
}

pub trait JobStore: Send + Sync {
    fn insert_job(&self, job: JobRecord) -> Result<(), StoreError>;
    fn job(&self, id: JobId) -> Result<Option<JobRecord>, StoreError>;
    fn update_job(&self, job: JobRecord) -> Result<(), StoreError>;
    fn delete_job(&self, id: JobId) -> Result<JobRecord, StoreError>;
    fn jobs(&self) -> Result<Vec<JobRecord>, StoreError>;
    fn jobs_by_employer(&self, employer: UserId) -> Result<Vec<JobRecord>, StoreError>;
    fn jobs_by_company(&self, company: CompanyId) -> Result<Vec<JobRecord>, StoreError>;
    /// Atomic counter adjustment, saturating at zero.
    fn adjust_total_applications(&self, id: JobId, delta: i64) -> Result<(), StoreError>;
    fn set_total_applications(&self, id: JobId, value: i64) -> Result<(), StoreError>;
    fn bump_total_views(&self, id: JobId) -> Result<(), StoreError>;
}

pub trait ApplicationStore: Send + Sync {
    /// Insert a new application; `Conflict` when the (job, seeker) pair
    /// already exists, regardless of the existing record's status.
    fn insert_application(&self, application: ApplicationRecord) -> Result<(), StoreError>;
    fn application(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;
    fn update_application(&self, application: ApplicationRecord) -> Result<(), StoreError>;
    fn applications(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn applications_by_seeker(&self, seeker: UserId) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn applications_by_job(&self, job: JobId) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn applications_by_employer(
        &self,
        employer: UserId,
    ) -> Result<Vec<ApplicationRecord>, StoreError>;
    /// Cascade used by job deletion; returns how many records were removed.
    fn delete_applications_for_job(&self, job: JobId) -> Result<usize, StoreError>;
}

pub trait NotificationStore: Send + Sync {
    fn insert_notification(&self, notification: NotificationRecord) -> Result<(), StoreError>;
    fn notifications_for(&self, recipient: UserId)
        -> Result<Vec<NotificationRecord>, StoreError>;
    fn mark_notification_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> Result<NotificationRecord, StoreError>;
    fn mark_all_notifications_read(&self, recipient: UserId) -> Result<usize, StoreError>;
}

pub trait SavedJobStore: Send + Sync {
    /// `Conflict` when the (seeker, job) pair is already saved.
    fn insert_saved_job(&self, saved: SavedJobRecord) -> Result<(), StoreError>;
    fn saved_jobs_for(&self, seeker: UserId) -> Result<Vec<SavedJobRecord>, StoreError>;
    fn delete_saved_job(&self, id: SavedJobId, seeker: UserId) -> Result<(), StoreError>;
}

pub trait FollowStore: Send + Sync {
    /// `Conflict` when the (seeker, company) pair already exists.
    fn insert_follow(&self, follow: FollowRecord) -> Result<(), StoreError>;
    fn delete_follow(&self, seeker: UserId, company: CompanyId) -> Result<(), StoreError>;
    fn follows_for(&self, seeker: UserId) -> Result<Vec<FollowRecord>, StoreError>;
    fn follows(&self) -> Result<Vec<FollowRecord>, StoreError>;
}

pub trait JobAlertStore: Send + Sync {
    fn insert_alert(&self, alert: JobAlertRecord) -> Result<(), StoreError>;
    fn alert(&self, id: JobAlertId, seeker: UserId)
        -> Result<Option<JobAlertRecord>, StoreError>;
    fn alerts_for(&self, seeker: UserId) -> Result<Vec<JobAlertRecord>, StoreError>;
    fn update_alert(&self, alert: JobAlertRecord) -> Result<(), StoreError>;
    fn delete_alert(&self, id: JobAlertId, seeker: UserId) -> Result<(), StoreError>;
}

pub trait ReportStore: Send + Sync {
    fn insert_report(&self, report: ReportRecord) -> Result<(), StoreError>;
    fn report(&self, id: ReportId) -> Result<Option<ReportRecord>, StoreError>;
    fn update_report(&self, report: ReportRecord) -> Result<(), StoreError>;
    fn reports(&self) -> Result<Vec<ReportRecord>, StoreError>;
}

/// The full store surface the wired-up application runs against.
pub trait EntityStore:
    UserStore
    + CompanyStore
    + JobStore
    + ApplicationStore
    + NotificationStore
    + SavedJobStore
    + FollowStore
    + JobAlertStore
    + ReportStore
{
}

impl<T> EntityStore for T where
    T: UserStore
        + CompanyStore
        + JobStore
        + ApplicationStore
        + NotificationStore
        + SavedJobStore
        + FollowStore
        + JobAlertStore
        + ReportStore
{
}
