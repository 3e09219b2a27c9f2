use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::LifecycleError;
use crate::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, CompanyId, CompanyProfile, CompanyRecord,
    FollowRecord, JobDraft, JobId, JobRecord, NotificationKind, NotificationRecord, SavedJobId,
    SavedJobRecord, UserId, UserRecord,
};
use crate::notify::{templates, EmailMessage, Mailer};
use crate::store::{EntityStore, StoreError};

/// Service composing the entity store and the mail boundary.
///
/// Each operation performs one primary write and then its side effects in
/// order. Counter adjustments go through the store's atomic primitives;
/// there is no transaction spanning the sequence, which is why
/// [`crate::reconcile`] exists.
pub struct LifecycleEngine<S, M> {
    store: Arc<S>,
    mailer: Arc<M>,
}

impl<S, M> LifecycleEngine<S, M>
where
    S: EntityStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, mailer: Arc<M>) -> Self {
        Self { store, mailer }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn dispatch(&self, message: EmailMessage) {
        if let Err(err) = self.mailer.send(message) {
            warn!(error = %err, "email dispatch failed");
        }
    }

    // ---- applications -----------------------------------------------------

    /// Submit an application for an open job.
    ///
    /// The (job, seeker) uniqueness check is the store's insert constraint,
    /// not a lookup, so two concurrent applies for the same pair cannot
    /// both succeed.
    pub fn apply(
        &self,
        job_id: JobId,
        seeker: &UserRecord,
        resume_id: Option<String>,
        cover_letter: Option<String>,
    ) -> Result<ApplicationRecord, LifecycleError> {
        let job = self
            .store
            .job(job_id)?
            .ok_or(LifecycleError::NotFound("job"))?;

        if !job.is_open() {
            return Err(LifecycleError::Conflict(
                "this job is no longer accepting applications".to_string(),
            ));
        }

        let application =
            ApplicationRecord::new(job.id, seeker.id, job.employer, resume_id, cover_letter);
        match self.store.insert_application(application.clone()) {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                return Err(LifecycleError::Conflict(
                    "you have already applied to this job".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        }

        self.store.adjust_total_applications(job.id, 1)?;

        self.store.insert_notification(
            NotificationRecord::new(
                job.employer,
                NotificationKind::NewApplicant,
                "New Application Received",
                format!(
                    "{} has applied for {}",
                    seeker.full_name(),
                    job.draft.title
                ),
            )
            .about_job(job.id)
            .about_application(application.id),
        )?;

        if let Some(employer) = self.store.user(job.employer)? {
            self.dispatch(templates::new_applicant(
                &employer.email,
                &job.draft.title,
                &seeker.full_name(),
            ));
        }
        let company_name = self
            .store
            .company(job.company)?
            .map(|company| company.profile.name)
            .unwrap_or_default();
        self.dispatch(templates::application_received(
            &seeker.email,
            &job.draft.title,
            &company_name,
        ));

        Ok(application)
    }

    /// Move an application through the review pipeline.
    ///
    /// Only the application's employer may call this; the transition table
    /// on [`ApplicationStatus`] decides legality, and `Withdrawn` is never
    /// reachable here.
    pub fn update_status(
        &self,
        application_id: ApplicationId,
        employer: UserId,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<ApplicationRecord, LifecycleError> {
        let mut application = self
            .store
            .application(application_id)?
            .filter(|a| a.employer == employer)
            .ok_or(LifecycleError::NotFound("application"))?;

        if new_status == ApplicationStatus::Withdrawn {
            return Err(LifecycleError::Conflict(
                "only the applicant can withdraw an application".to_string(),
            ));
        }
        if !application.status.allows_update_to(new_status) {
            return Err(LifecycleError::Conflict(format!(
                "cannot move application from {} to {}",
                application.status.label(),
                new_status.label()
            )));
        }

        let now = Utc::now();
        application.status = new_status;
        application.reviewed_at = Some(now);
        application.updated_status_at = Some(now);
        if let Some(notes) = notes {
            application.employer_notes = Some(notes);
        }
        self.store.update_application(application.clone())?;

        let job_title = self
            .store
            .job(application.job)?
            .map(|job| job.draft.title)
            .unwrap_or_default();

        self.store.insert_notification(
            NotificationRecord::new(
                application.job_seeker,
                NotificationKind::ApplicationStatus,
                "Application Status Updated",
                format!(
                    "Your application for {} has been updated to: {}",
                    job_title,
                    new_status.label()
                ),
            )
            .about_job(application.job)
            .about_application(application.id),
        )?;

        if let Some(seeker) = self.store.user(application.job_seeker)? {
            self.dispatch(templates::status_update(
                &seeker.email,
                &job_title,
                new_status.label(),
            ));
        }

        Ok(application)
    }

    /// Withdraw a pending application. Legal only from `Pending`; any other
    /// state leaves the record untouched and reports a conflict.
    pub fn withdraw(
        &self,
        application_id: ApplicationId,
        seeker: UserId,
    ) -> Result<ApplicationRecord, LifecycleError> {
        let mut application = self
            .store
            .application(application_id)?
            .filter(|a| a.job_seeker == seeker)
            .ok_or(LifecycleError::NotFound("application"))?;

        if application.status != ApplicationStatus::Pending {
            return Err(LifecycleError::Conflict(
                "cannot withdraw application at this stage".to_string(),
            ));
        }

        application.status = ApplicationStatus::Withdrawn;
        application.updated_status_at = Some(Utc::now());
        self.store.update_application(application.clone())?;

        self.store.adjust_total_applications(application.job, -1)?;

        Ok(application)
    }

    // ---- companies --------------------------------------------------------

    /// Create the caller's company profile. One per employer; the reference
    /// on the user record is updated alongside.
    pub fn create_company(
        &self,
        employer: &UserRecord,
        profile: CompanyProfile,
    ) -> Result<CompanyRecord, LifecycleError> {
        if self.store.company_by_employer(employer.id)?.is_some() {
            return Err(LifecycleError::Conflict(
                "company profile already exists".to_string(),
            ));
        }

        let company = CompanyRecord::new(employer.id, profile);
        self.store.insert_company(company.clone())?;

        let mut owner = self
            .store
            .user(employer.id)?
            .ok_or(LifecycleError::NotFound("user"))?;
        owner.company = Some(company.id);
        owner.updated_at = Utc::now();
        self.store.update_user(owner)?;

        Ok(company)
    }

    // ---- jobs -------------------------------------------------------------

    /// Post a job under the caller's company, bumping `Company.total_jobs`.
    pub fn post_job(
        &self,
        employer: &UserRecord,
        draft: JobDraft,
    ) -> Result<JobRecord, LifecycleError> {
        let company = self
            .store
            .company_by_employer(employer.id)?
            .ok_or_else(|| {
                LifecycleError::Conflict(
                    "create a company profile before posting jobs".to_string(),
                )
            })?;

        let job = JobRecord::new(employer.id, company.id, draft);
        self.store.insert_job(job.clone())?;
        self.store.adjust_total_jobs(company.id, 1)?;

        Ok(job)
    }

    /// Delete a job, its applications, and decrement the company counter.
    /// The application cascade bypasses the per-application decrement path,
    /// which is exactly the drift reconciliation repairs.
    pub fn delete_job(&self, job_id: JobId, employer: UserId) -> Result<(), LifecycleError> {
        let owned = self
            .store
            .job(job_id)?
            .filter(|job| job.employer == employer)
            .is_some();
        if !owned {
            return Err(LifecycleError::NotFound("job"));
        }

        let job = self.store.delete_job(job_id)?;
        self.store.adjust_total_jobs(job.company, -1)?;
        self.store.delete_applications_for_job(job_id)?;

        Ok(())
    }

    // ---- follows and saved jobs -------------------------------------------

    pub fn follow_company(
        &self,
        seeker: UserId,
        company_id: CompanyId,
    ) -> Result<(), LifecycleError> {
        let company = self
            .store
            .company(company_id)?
            .ok_or(LifecycleError::NotFound("company"))?;

        match self.store.insert_follow(FollowRecord::new(seeker, company.id)) {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                return Err(LifecycleError::Conflict(
                    "already following this company".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        }

        self.store.adjust_total_followers(company.id, 1)?;
        Ok(())
    }

    pub fn unfollow_company(
        &self,
        seeker: UserId,
        company_id: CompanyId,
    ) -> Result<(), LifecycleError> {
        match self.store.delete_follow(seeker, company_id) {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(LifecycleError::NotFound("follow"));
            }
            Err(err) => return Err(err.into()),
        }

        self.store.adjust_total_followers(company_id, -1)?;
        Ok(())
    }

    pub fn save_job(&self, seeker: UserId, job_id: JobId) -> Result<SavedJobRecord, LifecycleError> {
        if self.store.job(job_id)?.is_none() {
            return Err(LifecycleError::NotFound("job"));
        }

        let saved = SavedJobRecord::new(seeker, job_id);
        match self.store.insert_saved_job(saved.clone()) {
            Ok(()) => Ok(saved),
            Err(StoreError::Conflict) => {
                Err(LifecycleError::Conflict("job already saved".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn unsave_job(&self, id: SavedJobId, seeker: UserId) -> Result<(), LifecycleError> {
        match self.store.delete_saved_job(id, seeker) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(LifecycleError::NotFound("saved job")),
            Err(err) => Err(err.into()),
        }
    }

    // ---- accounts ---------------------------------------------------------

    /// Register a new user, dispatching the welcome email.
    pub fn register(&self, user: UserRecord) -> Result<UserRecord, LifecycleError> {
        let name = user.full_name();
        let email = user.email.clone();
        match self.store.insert_user(user.clone()) {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                return Err(LifecycleError::Conflict(
                    "email already registered".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        }

        let display = if name.is_empty() { email.clone() } else { name };
        self.dispatch(templates::welcome(&email, &display));

        Ok(user)
    }

    /// Hard-delete an account, cascading to an employer's owned company.
    pub fn delete_account(&self, user_id: UserId) -> Result<(), LifecycleError> {
        let user = match self.store.delete_user(user_id) {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(LifecycleError::NotFound("user")),
            Err(err) => return Err(err.into()),
        };

        if let Some(company) = user.company {
            if let Err(err) = self.store.delete_company(company) {
                warn!(error = %err, %user_id, "company cascade delete failed");
            }
        }

        Ok(())
    }
}
