use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::{
    ApplicationStore, CompanyStore, FollowStore, JobAlertStore, JobStore, NotificationStore,
    ReportStore, SavedJobStore, StoreError, UserStore,
};
use crate::domain::{
    ApplicationId, ApplicationRecord, CompanyId, CompanyRecord, FollowRecord, JobAlertId,
    JobAlertRecord, JobId, JobRecord, NotificationId, NotificationRecord, ReportId, ReportRecord,
    SavedJobId, SavedJobRecord, UserId, UserRecord,
};

#[derive(Default)]
struct Collections {
    users: HashMap<UserId, UserRecord>,
    companies: HashMap<CompanyId, CompanyRecord>,
    jobs: HashMap<JobId, JobRecord>,
    applications: HashMap<ApplicationId, ApplicationRecord>,
    /// Unique index backing the one-application-per-(job, seeker) rule.
    application_pairs: HashSet<(JobId, UserId)>,
    notifications: HashMap<NotificationId, NotificationRecord>,
    saved_jobs: HashMap<SavedJobId, SavedJobRecord>,
    saved_pairs: HashSet<(UserId, JobId)>,
    follows: HashMap<(UserId, CompanyId), FollowRecord>,
    alerts: HashMap<JobAlertId, JobAlertRecord>,
    reports: HashMap<ReportId, ReportRecord>,
}

/// In-memory document store. One mutex guards all collections, which is
/// what makes the counter adjust methods atomic with respect to each other
/// and to the record writes they accompany.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> T {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        f(&mut guard)
    }
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: UserRecord) -> Result<(), StoreError> {
        self.with(|c| {
            let email = user.email.to_ascii_lowercase();
            if c.users
                .values()
                .any(|u| u.email.eq_ignore_ascii_case(&email))
            {
                return Err(StoreError::Conflict);
            }
            c.users.insert(user.id, user);
            Ok(())
        })
    }

    fn user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.with(|c| Ok(c.users.get(&id).cloned()))
    }

    fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.with(|c| {
            Ok(c.users
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        })
    }

    fn update_user(&self, user: UserRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.users.contains_key(&user.id) {
                return Err(StoreError::NotFound);
            }
            c.users.insert(user.id, user);
            Ok(())
        })
    }

    fn delete_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.with(|c| c.users.remove(&id).ok_or(StoreError::NotFound))
    }

    fn users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c.users.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }
}

impl CompanyStore for MemoryStore {
    fn insert_company(&self, company: CompanyRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if c.companies.contains_key(&company.id) {
                return Err(StoreError::Conflict);
            }
            c.companies.insert(company.id, company);
            Ok(())
        })
    }

    fn company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, StoreError> {
        self.with(|c| Ok(c.companies.get(&id).cloned()))
    }

    fn company_by_employer(&self, employer: UserId) -> Result<Option<CompanyRecord>, StoreError> {
        self.with(|c| {
            Ok(c.companies
                .values()
                .find(|company| company.employer == employer)
                .cloned())
        })
    }

    fn update_company(&self, company: CompanyRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.companies.contains_key(&company.id) {
                return Err(StoreError::NotFound);
            }
            c.companies.insert(company.id, company);
            Ok(())
        })
    }

    fn delete_company(&self, id: CompanyId) -> Result<(), StoreError> {
        self.with(|c| {
            c.companies
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        })
    }

    fn companies(&self) -> Result<Vec<CompanyRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c.companies.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn adjust_total_jobs(&self, id: CompanyId, delta: i64) -> Result<(), StoreError> {
        self.with(|c| {
            let company = c.companies.get_mut(&id).ok_or(StoreError::NotFound)?;
            company.total_jobs = (company.total_jobs + delta).max(0);
            company.updated_at = Utc::now();
            Ok(())
        })
    }

    fn adjust_total_followers(&self, id: CompanyId, delta: i64) -> Result<(), StoreError> {
        self.with(|c| {
            let company = c.companies.get_mut(&id).ok_or(StoreError::NotFound)?;
            company.total_followers = (company.total_followers + delta).max(0);
            company.updated_at = Utc::now();
            Ok(())
        })
    }

    fn set_company_counters(
        &self,
        id: CompanyId,
        total_jobs: i64,
        total_followers: i64,
    ) -> Result<(), StoreError> {
        self.with(|c| {
            let company = c.companies.get_mut(&id).ok_or(StoreError::NotFound)?;
            company.total_jobs = total_jobs;
            company.total_followers = total_followers;
            company.updated_at = Utc::now();
            Ok(())
        })
    }
}

impl JobStore for MemoryStore {
    fn insert_job(&self, job: JobRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if c.jobs.contains_key(&job.id) {
                return Err(StoreError::Conflict);
            }
            c.jobs.insert(job.id, job);
            Ok(())
        })
    }

    fn job(&self, id: JobId) -> Result<Option<JobRecord>, StoreError> {
        self.with(|c| Ok(c.jobs.get(&id).cloned()))
    }

    fn update_job(&self, job: JobRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.jobs.contains_key(&job.id) {
                return Err(StoreError::NotFound);
            }
            c.jobs.insert(job.id, job);
            Ok(())
        })
    }

    fn delete_job(&self, id: JobId) -> Result<JobRecord, StoreError> {
        self.with(|c| c.jobs.remove(&id).ok_or(StoreError::NotFound))
    }

    fn jobs(&self) -> Result<Vec<JobRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c.jobs.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn jobs_by_employer(&self, employer: UserId) -> Result<Vec<JobRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .jobs
                .values()
                .filter(|job| job.employer == employer)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn jobs_by_company(&self, company: CompanyId) -> Result<Vec<JobRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .jobs
                .values()
                .filter(|job| job.company == company)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn adjust_total_applications(&self, id: JobId, delta: i64) -> Result<(), StoreError> {
        self.with(|c| {
            let job = c.jobs.get_mut(&id).ok_or(StoreError::NotFound)?;
            job.total_applications = (job.total_applications + delta).max(0);
            job.updated_at = Utc::now();
            Ok(())
        })
    }

    fn set_total_applications(&self, id: JobId, value: i64) -> Result<(), StoreError> {
        self.with(|c| {
            let job = c.jobs.get_mut(&id).ok_or(StoreError::NotFound)?;
            job.total_applications = value;
            job.updated_at = Utc::now();
            Ok(())
        })
    }

    fn bump_total_views(&self, id: JobId) -> Result<(), StoreError> {
        self.with(|c| {
            let job = c.jobs.get_mut(&id).ok_or(StoreError::NotFound)?;
            job.total_views += 1;
            Ok(())
        })
    }
}

impl ApplicationStore for MemoryStore {
    fn insert_application(&self, application: ApplicationRecord) -> Result<(), StoreError> {
        self.with(|c| {
            let pair = (application.job, application.job_seeker);
            if !c.application_pairs.insert(pair) {
                return Err(StoreError::Conflict);
            }
            c.applications.insert(application.id, application);
            Ok(())
        })
    }

    fn application(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        self.with(|c| Ok(c.applications.get(&id).cloned()))
    }

    fn update_application(&self, application: ApplicationRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.applications.contains_key(&application.id) {
                return Err(StoreError::NotFound);
            }
            c.applications.insert(application.id, application);
            Ok(())
        })
    }

    fn applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.with(|c| Ok(c.applications.values().cloned().collect()))
    }

    fn applications_by_seeker(&self, seeker: UserId) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .applications
                .values()
                .filter(|a| a.job_seeker == seeker)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
            Ok(all)
        })
    }

    fn applications_by_job(&self, job: JobId) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .applications
                .values()
                .filter(|a| a.job == job)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
            Ok(all)
        })
    }

    fn applications_by_employer(
        &self,
        employer: UserId,
    ) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .applications
                .values()
                .filter(|a| a.employer == employer)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
            Ok(all)
        })
    }

    fn delete_applications_for_job(&self, job: JobId) -> Result<usize, StoreError> {
        self.with(|c| {
            let doomed: Vec<ApplicationId> = c
                .applications
                .values()
                .filter(|a| a.job == job)
                .map(|a| a.id)
                .collect();
            for id in &doomed {
                if let Some(removed) = c.applications.remove(id) {
                    c.application_pairs.remove(&(removed.job, removed.job_seeker));
                }
            }
            Ok(doomed.len())
        })
    }
}

impl NotificationStore for MemoryStore {
    fn insert_notification(&self, notification: NotificationRecord) -> Result<(), StoreError> {
        self.with(|c| {
            c.notifications.insert(notification.id, notification);
            Ok(())
        })
    }

    fn notifications_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .notifications
                .values()
                .filter(|n| n.recipient == recipient)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn mark_notification_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> Result<NotificationRecord, StoreError> {
        self.with(|c| {
            let notification = c
                .notifications
                .get_mut(&id)
                .filter(|n| n.recipient == recipient)
                .ok_or(StoreError::NotFound)?;
            notification.is_read = true;
            notification.read_at = Some(Utc::now());
            Ok(notification.clone())
        })
    }

    fn mark_all_notifications_read(&self, recipient: UserId) -> Result<usize, StoreError> {
        self.with(|c| {
            let now = Utc::now();
            let mut updated = 0;
            for notification in c
                .notifications
                .values_mut()
                .filter(|n| n.recipient == recipient && !n.is_read)
            {
                notification.is_read = true;
                notification.read_at = Some(now);
                updated += 1;
            }
            Ok(updated)
        })
    }
}

impl SavedJobStore for MemoryStore {
    fn insert_saved_job(&self, saved: SavedJobRecord) -> Result<(), StoreError> {
        self.with(|c| {
            let pair = (saved.job_seeker, saved.job);
            if !c.saved_pairs.insert(pair) {
                return Err(StoreError::Conflict);
            }
            c.saved_jobs.insert(saved.id, saved);
            Ok(())
        })
    }

    fn saved_jobs_for(&self, seeker: UserId) -> Result<Vec<SavedJobRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .saved_jobs
                .values()
                .filter(|s| s.job_seeker == seeker)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
            Ok(all)
        })
    }

    fn delete_saved_job(&self, id: SavedJobId, seeker: UserId) -> Result<(), StoreError> {
        self.with(|c| {
            match c.saved_jobs.get(&id) {
                Some(saved) if saved.job_seeker == seeker => {}
                _ => return Err(StoreError::NotFound),
            }
            if let Some(removed) = c.saved_jobs.remove(&id) {
                c.saved_pairs.remove(&(removed.job_seeker, removed.job));
            }
            Ok(())
        })
    }
}

impl FollowStore for MemoryStore {
    fn insert_follow(&self, follow: FollowRecord) -> Result<(), StoreError> {
        self.with(|c| {
            let key = (follow.job_seeker, follow.company);
            if c.follows.contains_key(&key) {
                return Err(StoreError::Conflict);
            }
            c.follows.insert(key, follow);
            Ok(())
        })
    }

    fn delete_follow(&self, seeker: UserId, company: CompanyId) -> Result<(), StoreError> {
        self.with(|c| {
            c.follows
                .remove(&(seeker, company))
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        })
    }

    fn follows_for(&self, seeker: UserId) -> Result<Vec<FollowRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .follows
                .values()
                .filter(|f| f.job_seeker == seeker)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.followed_at.cmp(&a.followed_at));
            Ok(all)
        })
    }

    fn follows(&self) -> Result<Vec<FollowRecord>, StoreError> {
        self.with(|c| Ok(c.follows.values().cloned().collect()))
    }
}

impl JobAlertStore for MemoryStore {
    fn insert_alert(&self, alert: JobAlertRecord) -> Result<(), StoreError> {
        self.with(|c| {
            c.alerts.insert(alert.id, alert);
            Ok(())
        })
    }

    fn alert(
        &self,
        id: JobAlertId,
        seeker: UserId,
    ) -> Result<Option<JobAlertRecord>, StoreError> {
        self.with(|c| {
            Ok(c.alerts
                .get(&id)
                .filter(|a| a.job_seeker == seeker)
                .cloned())
        })
    }

    fn alerts_for(&self, seeker: UserId) -> Result<Vec<JobAlertRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c
                .alerts
                .values()
                .filter(|a| a.job_seeker == seeker)
                .cloned()
                .collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn update_alert(&self, alert: JobAlertRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.alerts.contains_key(&alert.id) {
                return Err(StoreError::NotFound);
            }
            c.alerts.insert(alert.id, alert);
            Ok(())
        })
    }

    fn delete_alert(&self, id: JobAlertId, seeker: UserId) -> Result<(), StoreError> {
        self.with(|c| {
            match c.alerts.get(&id) {
                Some(alert) if alert.job_seeker == seeker => {
                    c.alerts.remove(&id);
                    Ok(())
                }
                _ => Err(StoreError::NotFound),
            }
        })
    }
}

impl ReportStore for MemoryStore {
    fn insert_report(&self, report: ReportRecord) -> Result<(), StoreError> {
        self.with(|c| {
            c.reports.insert(report.id, report);
            Ok(())
        })
    }

    fn report(&self, id: ReportId) -> Result<Option<ReportRecord>, StoreError> {
        self.with(|c| Ok(c.reports.get(&id).cloned()))
    }

    fn update_report(&self, report: ReportRecord) -> Result<(), StoreError> {
        self.with(|c| {
            if !c.reports.contains_key(&report.id) {
                return Err(StoreError::NotFound);
            }
            c.reports.insert(report.id, report);
            Ok(())
        })
    }

    fn reports(&self) -> Result<Vec<ReportRecord>, StoreError> {
        self.with(|c| {
            let mut all: Vec<_> = c.reports.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }
}
