use std::sync::{Arc, Mutex};

use crate::domain::{
    CompanyProfile, CompanyRecord, JobDraft, JobRecord, JobStatus, JobType, Role, UserRecord,
    WorkMode,
};
use crate::lifecycle::LifecycleEngine;
use crate::notify::{EmailMessage, MailError, Mailer};
use crate::store::{CompanyStore, JobStore, MemoryStore, UserStore};

/// Captures dispatched mail so tests can assert on side effects.
#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        self.sent.lock().expect("mailer mutex poisoned").push(message);
        Ok(())
    }
}

/// Always fails, for verifying that mail errors never surface.
#[derive(Default, Clone, Copy)]
pub(super) struct BrokenMailer;

impl Mailer for BrokenMailer {
    fn send(&self, _message: EmailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("smtp down".to_string()))
    }
}

pub(super) fn engine() -> (
    Arc<MemoryStore>,
    Arc<RecordingMailer>,
    LifecycleEngine<MemoryStore, RecordingMailer>,
) {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let engine = LifecycleEngine::new(store.clone(), mailer.clone());
    (store, mailer, engine)
}

pub(super) fn seed_user(store: &MemoryStore, role: Role, email: &str, name: &str) -> UserRecord {
    let user = UserRecord::new(email.to_string(), "digest".to_string(), role, name);
    store.insert_user(user.clone()).expect("user inserts");
    user
}

pub(super) fn seed_employer_with_company(
    store: &MemoryStore,
    email: &str,
) -> (UserRecord, CompanyRecord) {
    let mut employer = seed_user(store, Role::Employer, email, "Erin Vale");
    let company = CompanyRecord::new(
        employer.id,
        CompanyProfile {
            name: "Vale Robotics".to_string(),
            ..CompanyProfile::default()
        },
    );
    store.insert_company(company.clone()).expect("company inserts");
    employer.company = Some(company.id);
    store.update_user(employer.clone()).expect("user updates");
    (employer, company)
}

pub(super) fn job_draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: "Build and run backend services.".to_string(),
        requirements: None,
        location: Default::default(),
        salary: Default::default(),
        work_mode: WorkMode::Remote,
        job_type: JobType::Fulltime,
        experience_level: None,
        category: None,
        skills: vec!["rust".to_string()],
        status: JobStatus::Open,
        deadline: None,
    }
}

pub(super) fn seed_open_job(
    store: &MemoryStore,
    employer: &UserRecord,
    company: &CompanyRecord,
    title: &str,
) -> JobRecord {
    let job = JobRecord::new(employer.id, company.id, job_draft(title));
    store.insert_job(job.clone()).expect("job inserts");
    job
}
