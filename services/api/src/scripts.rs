//! Offline maintenance commands: admin provisioning and the counter sync
//! pass. Each command builds its own store instance and runs to completion.

use crate::infra::{credential_failure, store_failure};
use jobmatch::auth::hash_password;
use jobmatch::config::{AdminConfig, AppConfig};
use jobmatch::domain::{Role, UserRecord};
use jobmatch::error::AppError;
use jobmatch::reconcile::{reconcile_applications, reconcile_companies};
use jobmatch::store::{
    ApplicationStore, CompanyStore, FollowStore, JobStore, MemoryStore, UserStore,
};
use jobmatch::telemetry;
use tracing::info;

/// Create the configured admin account unless the email is already taken.
/// Returns whether a record was created, so callers can log accordingly.
pub(crate) fn seed_admin<S: UserStore>(store: &S, admin: &AdminConfig) -> Result<bool, AppError> {
    if store
        .user_by_email(&admin.email)
        .map_err(store_failure)?
        .is_some()
    {
        return Ok(false);
    }

    let digest = hash_password(&admin.password).map_err(credential_failure)?;
    let user = UserRecord::new(admin.email.clone(), digest, Role::Admin, "Platform Admin");
    store.insert_user(user).map_err(store_failure)?;

    Ok(true)
}

pub(crate) fn run_seed_admin() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(env!("CARGO_CRATE_NAME"), &config.telemetry)?;

    let store = MemoryStore::new();
    if seed_admin(&store, &config.admin)? {
        info!(email = %config.admin.email, "admin account created");
    } else {
        info!(email = %config.admin.email, "admin account already present");
    }

    Ok(())
}

/// Run both reconciliation passes, logging a summary. Each corrected record
/// is already logged by the passes themselves.
pub(crate) fn sync_counters<S>(store: &S) -> Result<(usize, usize), AppError>
where
    S: JobStore + ApplicationStore + CompanyStore + FollowStore,
{
    let corrected_jobs = reconcile_applications(store).map_err(store_failure)?;
    let corrected_companies = reconcile_companies(store).map_err(store_failure)?;

    info!(
        jobs = corrected_jobs.len(),
        companies = corrected_companies.len(),
        "counter sync complete"
    );

    Ok((corrected_jobs.len(), corrected_companies.len()))
}

pub(crate) fn run_sync_applications_count() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(env!("CARGO_CRATE_NAME"), &config.telemetry)?;

    let store = MemoryStore::new();
    sync_counters(&store)?;

    Ok(())
}
