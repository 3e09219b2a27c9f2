//! Offline recomputation of the denormalized counters.
//!
//! The live increment/decrement paths are not transactional, so a crash
//! between an application insert and the counter bump, or a cascading job
//! deletion, leaves the counters adrift. These passes recompute each
//! counter from its source records and overwrite it when it differs.
//!
//! Advisory only: there is no locking, so records written during a pass may
//! be missed or double-counted until the next run. Withdrawn applications
//! are excluded from the recomputed count, matching the decrement the
//! withdraw operation performs.

use serde::Serialize;
use tracing::info;

use crate::domain::{CompanyId, JobId};
use crate::store::{ApplicationStore, CompanyStore, FollowStore, JobStore, StoreError};

/// One job whose counter was overwritten.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectedJob {
    pub job: JobId,
    pub title: String,
    pub previous: i64,
    pub actual: i64,
}

/// One company whose counters were overwritten.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectedCompany {
    pub company: CompanyId,
    pub name: String,
    pub previous_jobs: i64,
    pub actual_jobs: i64,
    pub previous_followers: i64,
    pub actual_followers: i64,
}

/// Recompute `Job.total_applications` for every job. Side-effect free
/// beyond the counter writes; no notifications are created.
pub fn reconcile_applications<S>(store: &S) -> Result<Vec<CorrectedJob>, StoreError>
where
    S: JobStore + ApplicationStore,
{
    let mut corrected = Vec::new();

    for job in store.jobs()? {
        let actual = store
            .applications_by_job(job.id)?
            .iter()
            .filter(|a| a.counts_toward_total())
            .count() as i64;

        if job.total_applications != actual {
            store.set_total_applications(job.id, actual)?;
            info!(
                job = %job.id,
                title = %job.draft.title,
                previous = job.total_applications,
                actual,
                "corrected application counter"
            );
            corrected.push(CorrectedJob {
                job: job.id,
                title: job.draft.title.clone(),
                previous: job.total_applications,
                actual,
            });
        }
    }

    Ok(corrected)
}

/// Recompute `Company.total_jobs` and `Company.total_followers` for every
/// company. The source system had no equivalent pass; these counters drift
/// the same way, so they get the same repair.
pub fn reconcile_companies<S>(store: &S) -> Result<Vec<CorrectedCompany>, StoreError>
where
    S: CompanyStore + JobStore + FollowStore,
{
    let follows = store.follows()?;
    let mut corrected = Vec::new();

    for company in store.companies()? {
        let actual_jobs = store.jobs_by_company(company.id)?.len() as i64;
        let actual_followers = follows
            .iter()
            .filter(|f| f.company == company.id)
            .count() as i64;

        if company.total_jobs != actual_jobs || company.total_followers != actual_followers {
            store.set_company_counters(company.id, actual_jobs, actual_followers)?;
            info!(
                company = %company.id,
                name = %company.profile.name,
                previous_jobs = company.total_jobs,
                actual_jobs,
                previous_followers = company.total_followers,
                actual_followers,
                "corrected company counters"
            );
            corrected.push(CorrectedCompany {
                company: company.id,
                name: company.profile.name.clone(),
                previous_jobs: company.total_jobs,
                actual_jobs,
                previous_followers: company.total_followers,
                actual_followers,
            });
        }
    }

    Ok(corrected)
}
