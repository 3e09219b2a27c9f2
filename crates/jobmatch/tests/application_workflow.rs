//! Integration specification for the application lifecycle and counter
//! contract, exercised through the crate's public facade: apply, review,
//! withdraw, and the reconciliation pass that keeps the denormalized
//! counters honest.

use std::sync::Arc;

use jobmatch::domain::{
    ApplicationStatus, CompanyProfile, CompanyRecord, JobDraft, JobRecord, JobStatus, JobType,
    Role, UserRecord, WorkMode,
};
use jobmatch::lifecycle::{LifecycleEngine, LifecycleError};
use jobmatch::notify::NullMailer;
use jobmatch::reconcile::reconcile_applications;
use jobmatch::store::{
    ApplicationStore, CompanyStore, JobStore, MemoryStore, NotificationStore, UserStore,
};

fn setup() -> (
    Arc<MemoryStore>,
    LifecycleEngine<MemoryStore, NullMailer>,
    UserRecord,
    JobRecord,
    UserRecord,
) {
    let store = Arc::new(MemoryStore::new());
    let engine = LifecycleEngine::new(store.clone(), Arc::new(NullMailer));

    let employer = UserRecord::new(
        "erin@vale.test".to_string(),
        "digest".to_string(),
        Role::Employer,
        "Erin Vale",
    );
    store.insert_user(employer.clone()).expect("employer inserts");

    let company = CompanyRecord::new(
        employer.id,
        CompanyProfile {
            name: "Vale Robotics".to_string(),
            ..CompanyProfile::default()
        },
    );
    store.insert_company(company.clone()).expect("company inserts");

    let job = JobRecord::new(
        employer.id,
        company.id,
        JobDraft {
            title: "Backend Engineer".to_string(),
            description: "Own the job-board services.".to_string(),
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
        },
    );
    store.insert_job(job.clone()).expect("job inserts");

    let seeker = UserRecord::new(
        "ana@seeker.test".to_string(),
        "digest".to_string(),
        Role::JobSeeker,
        "Ana Silva",
    );
    store.insert_user(seeker.clone()).expect("seeker inserts");

    (store, engine, employer, job, seeker)
}

#[test]
fn full_lifecycle_keeps_the_counter_contract() {
    let (store, engine, employer, job, seeker) = setup();

    // Apply: pending, counter 1, one employer notification.
    let application = engine
        .apply(job.id, &seeker, Some("resume-1".to_string()), None)
        .expect("apply succeeds");
    assert_eq!(application.status, ApplicationStatus::Pending);

    let stored_job = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored_job.total_applications, 1);
    let notifications = store
        .notifications_for(employer.id)
        .expect("notifications load");
    assert_eq!(
        notifications
            .iter()
            .filter(|n| n.related_application == Some(application.id))
            .count(),
        1
    );

    // Withdraw: counter back to 0, status terminal.
    engine
        .withdraw(application.id, seeker.id)
        .expect("withdraw succeeds");
    let stored_job = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored_job.total_applications, 0);
    let stored = store
        .application(application.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.status, ApplicationStatus::Withdrawn);

    // Reapplying is blocked: the pair index outlives the withdrawal.
    assert!(matches!(
        engine.apply(job.id, &seeker, None, None),
        Err(LifecycleError::Conflict(_))
    ));

    // Reconciliation agrees with the live counter exactly.
    let corrected = reconcile_applications(store.as_ref()).expect("pass runs");
    assert!(corrected.is_empty());
}

#[test]
fn accepted_applications_cannot_be_withdrawn() {
    let (_store, engine, employer, job, seeker) = setup();

    let application = engine.apply(job.id, &seeker, None, None).expect("apply");
    engine
        .update_status(application.id, employer.id, ApplicationStatus::Accepted, None)
        .expect("pending to accepted is legal");

    assert!(matches!(
        engine.withdraw(application.id, seeker.id),
        Err(LifecycleError::Conflict(_))
    ));
}

#[test]
fn cascading_job_deletion_drift_is_repaired_by_reconciliation() {
    let (store, engine, employer, job, seeker) = setup();

    engine.apply(job.id, &seeker, None, None).expect("apply");

    // A direct deletion of applications bypasses the decrement path.
    store
        .delete_applications_for_job(job.id)
        .expect("cascade runs");
    let stored_job = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored_job.total_applications, 1, "counter now stale");

    let corrected = reconcile_applications(store.as_ref()).expect("pass runs");
    assert_eq!(corrected.len(), 1);
    assert_eq!(corrected[0].actual, 0);

    let stored_job = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored_job.total_applications, 0);
    let _ = employer;
}
