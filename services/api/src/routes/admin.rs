//! Admin surface: user moderation, company verification, and platform
//! stats. Admin accounts come from the seed script.

use super::{envelope, paginated, UserView};
use crate::extract::{Admin, AuthUser};
use crate::infra::{store_failure, ApiContext};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use chrono::Utc;
use jobmatch::domain::{
    CompanyId, NotificationKind, NotificationRecord, ReportId, ReportRecord, ReportStatus,
    ReportTarget, Role, UserId, VerificationStatus,
};
use jobmatch::error::{AppError, FieldError};
use jobmatch::search::Pagination;
use jobmatch::store::{
    ApplicationStore, CompanyStore, JobStore, NotificationStore, ReportStore, UserStore,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn router() -> Router<ApiContext> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/active", patch(set_user_active))
        .route("/companies/:id/verify", patch(verify_company))
        .route("/reports", get(list_reports).post(create_report))
        .route("/reports/:id", patch(update_report_status))
        .route("/stats", get(stats))
}

async fn list_users(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let users: Vec<UserView> = ctx
        .store
        .users()
        .map_err(store_failure)?
        .into_iter()
        .map(UserView::from)
        .collect();
    Ok(paginated("users", page.slice(users)))
}

#[derive(Debug, Deserialize)]
struct ActiveRequest {
    is_active: bool,
}

async fn set_user_active(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
    Path(id): Path<UserId>,
    Json(payload): Json<ActiveRequest>,
) -> Result<Json<Value>, AppError> {
    let mut user = ctx
        .store
        .user(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("user"))?;
    if user.role == Role::Admin {
        return Err(AppError::conflict("admin accounts cannot be moderated"));
    }

    user.is_active = payload.is_active;
    user.updated_at = Utc::now();
    ctx.store.update_user(user.clone()).map_err(store_failure)?;

    Ok(envelope("user updated", UserView::from(user)))
}

async fn delete_user(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
    Path(id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    let target = ctx
        .store
        .user(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("user"))?;
    if target.role == Role::Admin {
        return Err(AppError::conflict("admin accounts cannot be moderated"));
    }

    ctx.engine.delete_account(id)?;
    Ok(envelope("user deleted", Value::Null))
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    status: VerificationStatus,
}

async fn verify_company(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
    Path(id): Path<CompanyId>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<Value>, AppError> {
    let mut company = ctx
        .store
        .company(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("company"))?;

    company.verification = payload.status;
    company.verified_at = matches!(payload.status, VerificationStatus::Verified).then(Utc::now);
    company.updated_at = Utc::now();
    ctx.store
        .update_company(company.clone())
        .map_err(store_failure)?;

    if company.is_verified() {
        ctx.store
            .insert_notification(
                NotificationRecord::new(
                    company.employer,
                    NotificationKind::CompanyUpdate,
                    "Company Verified",
                    format!("{} has been verified", company.profile.name),
                )
                .about_company(company.id),
            )
            .map_err(store_failure)?;
    }

    Ok(envelope("company verification updated", company))
}

// ---- reports --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ReportRequest {
    #[serde(flatten)]
    target: ReportTarget,
    reason: String,
    #[serde(default)]
    description: Option<String>,
}

/// Open to every authenticated role, not just admins.
async fn create_report(
    State(ctx): State<ApiContext>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::validation(vec![FieldError::new(
            "reason",
            "reason is required",
        )]));
    }

    let target_exists = match payload.target {
        ReportTarget::User(id) => ctx.store.user(id).map_err(store_failure)?.is_some(),
        ReportTarget::Job(id) => ctx.store.job(id).map_err(store_failure)?.is_some(),
        ReportTarget::Company(id) => ctx.store.company(id).map_err(store_failure)?.is_some(),
    };
    if !target_exists {
        return Err(AppError::not_found(payload.target.kind()));
    }

    let report = ReportRecord::new(user.id, payload.target, payload.reason, payload.description);
    ctx.store.insert_report(report.clone()).map_err(store_failure)?;

    Ok((StatusCode::CREATED, envelope("report submitted", report)))
}

#[derive(Debug, Deserialize)]
struct ReportFilter {
    #[serde(default)]
    status: Option<ReportStatus>,
    #[serde(default)]
    target_type: Option<String>,
}

async fn list_reports(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
    Query(filter): Query<ReportFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let reports: Vec<ReportRecord> = ctx
        .store
        .reports()
        .map_err(store_failure)?
        .into_iter()
        .filter(|report| filter.status.map_or(true, |status| report.status == status))
        .filter(|report| {
            filter
                .target_type
                .as_deref()
                .map_or(true, |kind| report.target.kind() == kind)
        })
        .collect();
    Ok(paginated("reports", page.slice(reports)))
}

#[derive(Debug, Deserialize)]
struct ReportReviewRequest {
    status: ReportStatus,
    #[serde(default)]
    action_taken: Option<String>,
}

async fn update_report_status(
    State(ctx): State<ApiContext>,
    Admin(admin): Admin,
    Path(id): Path<ReportId>,
    Json(payload): Json<ReportReviewRequest>,
) -> Result<Json<Value>, AppError> {
    let mut report = ctx
        .store
        .report(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("report"))?;
    report.review(admin.id, payload.status, payload.action_taken);
    ctx.store.update_report(report.clone()).map_err(store_failure)?;

    Ok(envelope("report status updated", report))
}

async fn stats(
    State(ctx): State<ApiContext>,
    Admin(_admin): Admin,
) -> Result<Json<Value>, AppError> {
    let users = ctx.store.users().map_err(store_failure)?;
    let companies = ctx.store.companies().map_err(store_failure)?;
    let jobs = ctx.store.jobs().map_err(store_failure)?;
    let applications = ctx.store.applications().map_err(store_failure)?;

    Ok(envelope(
        "stats",
        json!({
            "total_users": users.len(),
            "job_seekers": users.iter().filter(|u| u.role == Role::JobSeeker).count(),
            "employers": users.iter().filter(|u| u.role == Role::Employer).count(),
            "total_companies": companies.len(),
            "verified_companies": companies.iter().filter(|c| c.is_verified()).count(),
            "total_jobs": jobs.len(),
            "open_jobs": jobs.iter().filter(|j| j.is_open()).count(),
            "total_applications": applications
                .iter()
                .filter(|a| a.counts_toward_total())
                .count(),
        }),
    ))
}
