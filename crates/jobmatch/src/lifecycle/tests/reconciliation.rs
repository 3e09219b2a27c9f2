use super::common::*;
use crate::domain::Role;
use crate::reconcile::{reconcile_applications, reconcile_companies};
use crate::store::{CompanyStore, JobStore};

#[test]
fn reconcile_repairs_drifted_application_counters() {
    let (store, _mailer, engine) = engine();
    let (employer, company) = seed_employer_with_company(&store, "erin@vale.test");
    let job = seed_open_job(&store, &employer, &company, "Backend Engineer");
    let seeker = seed_user(&store, Role::JobSeeker, "ana@seeker.test", "Ana Silva");
    let other = seed_user(&store, Role::JobSeeker, "bob@seeker.test", "Bob Stone");

    engine.apply(job.id, &seeker, None, None).expect("apply");
    engine.apply(job.id, &other, None, None).expect("apply");

    // Simulate a crash between insert and increment.
    store
        .set_total_applications(job.id, 7)
        .expect("drift injected");

    let corrected = reconcile_applications(store.as_ref()).expect("pass runs");
    assert_eq!(corrected.len(), 1);
    assert_eq!(corrected[0].previous, 7);
    assert_eq!(corrected[0].actual, 2);

    let stored = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored.total_applications, 2);
}

#[test]
fn reconcile_excludes_withdrawn_applications() {
    let (store, _mailer, engine) = engine();
    let (employer, company) = seed_employer_with_company(&store, "erin@vale.test");
    let job = seed_open_job(&store, &employer, &company, "Backend Engineer");
    let seeker = seed_user(&store, Role::JobSeeker, "ana@seeker.test", "Ana Silva");
    let other = seed_user(&store, Role::JobSeeker, "bob@seeker.test", "Bob Stone");

    let first = engine.apply(job.id, &seeker, None, None).expect("apply");
    engine.apply(job.id, &other, None, None).expect("apply");
    engine.withdraw(first.id, seeker.id).expect("withdraw");

    // The live path already decremented; a correct pass changes nothing.
    let corrected = reconcile_applications(store.as_ref()).expect("pass runs");
    assert!(corrected.is_empty(), "live counter already agrees: {corrected:?}");

    let stored = store.job(job.id).expect("fetch").expect("present");
    assert_eq!(stored.total_applications, 1);
}

#[test]
fn reconcile_is_idempotent() {
    let (store, _mailer, engine) = engine();
    let (employer, company) = seed_employer_with_company(&store, "erin@vale.test");
    let job = seed_open_job(&store, &employer, &company, "Backend Engineer");
    let seeker = seed_user(&store, Role::JobSeeker, "ana@seeker.test", "Ana Silva");

    engine.apply(job.id, &seeker, None, None).expect("apply");
    store
        .set_total_applications(job.id, 0)
        .expect("drift injected");

    let first = reconcile_applications(store.as_ref()).expect("pass runs");
    assert_eq!(first.len(), 1);
    let second = reconcile_applications(store.as_ref()).expect("pass runs");
    assert!(second.is_empty());
}

#[test]
fn reconcile_companies_repairs_job_and_follower_counters() {
    let (store, _mailer, engine) = engine();
    let (employer, company) = seed_employer_with_company(&store, "erin@vale.test");
    let seeker = seed_user(&store, Role::JobSeeker, "ana@seeker.test", "Ana Silva");

    engine
        .post_job(&employer, job_draft("Platform Engineer"))
        .expect("post succeeds");
    engine
        .follow_company(seeker.id, company.id)
        .expect("follow succeeds");

    store
        .set_company_counters(company.id, 9, 0)
        .expect("drift injected");

    let corrected = reconcile_companies(store.as_ref()).expect("pass runs");
    assert_eq!(corrected.len(), 1);
    assert_eq!(corrected[0].actual_jobs, 1);
    assert_eq!(corrected[0].actual_followers, 1);

    let stored = store.company(company.id).expect("fetch").expect("present");
    assert_eq!(stored.total_jobs, 1);
    assert_eq!(stored.total_followers, 1);
}
