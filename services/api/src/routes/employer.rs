//! Employer surface: company profile, job postings, applicant review, and
//! the dashboard stats.

use super::{envelope, paginated};
use crate::extract::Employer;
use crate::infra::{store_failure, ApiContext};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use jobmatch::domain::{ApplicationId, ApplicationStatus, CompanyProfile, JobDraft, JobId, JobStatus};
use jobmatch::error::{AppError, FieldError};
use jobmatch::search::Pagination;
use jobmatch::store::{ApplicationStore, CompanyStore, JobStore};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub(crate) fn router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/company",
            post(create_company).get(company_profile).put(update_company),
        )
        .route("/jobs", post(post_job).get(list_jobs))
        .route("/jobs/:id", get(job_detail).put(update_job).delete(delete_job))
        .route("/jobs/:id/status", patch(update_job_status))
        .route("/jobs/:id/applicants", get(applicants))
        .route("/applications/:id/status", patch(update_application_status))
        .route("/stats", get(stats))
}

// ---- company --------------------------------------------------------------

fn validate_profile(profile: &CompanyProfile) -> Result<(), AppError> {
    if profile.name.trim().is_empty() {
        return Err(AppError::validation(vec![FieldError::new(
            "name",
            "company name is required",
        )]));
    }
    Ok(())
}

async fn create_company(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Json(profile): Json<CompanyProfile>,
) -> Result<impl IntoResponse, AppError> {
    validate_profile(&profile)?;
    let company = ctx.engine.create_company(&user, profile)?;
    Ok((StatusCode::CREATED, envelope("company created", company)))
}

async fn company_profile(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
) -> Result<Json<Value>, AppError> {
    let company = ctx
        .store
        .company_by_employer(user.id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("company"))?;
    Ok(envelope("company", company))
}

async fn update_company(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Json(profile): Json<CompanyProfile>,
) -> Result<Json<Value>, AppError> {
    validate_profile(&profile)?;
    let mut company = ctx
        .store
        .company_by_employer(user.id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("company"))?;
    company.profile = profile;
    company.updated_at = Utc::now();
    ctx.store
        .update_company(company.clone())
        .map_err(store_failure)?;

    Ok(envelope("company updated", company))
}

// ---- jobs -----------------------------------------------------------------

fn validate_draft(draft: &JobDraft) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if draft.title.trim().is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    }
    if draft.description.trim().is_empty() {
        errors.push(FieldError::new("description", "description is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors))
    }
}

async fn post_job(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Json(draft): Json<JobDraft>,
) -> Result<impl IntoResponse, AppError> {
    validate_draft(&draft)?;
    let job = ctx.engine.post_job(&user, draft)?;
    Ok((StatusCode::CREATED, envelope("job posted", job)))
}

async fn list_jobs(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let jobs = ctx.store.jobs_by_employer(user.id).map_err(store_failure)?;
    Ok(paginated("jobs", page.slice(jobs)))
}

async fn job_detail(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<JobId>,
) -> Result<Json<Value>, AppError> {
    let job = ctx
        .store
        .job(id)
        .map_err(store_failure)?
        .filter(|job| job.employer == user.id)
        .ok_or_else(|| AppError::not_found("job"))?;
    Ok(envelope("job", job))
}

async fn update_job(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<JobId>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Value>, AppError> {
    validate_draft(&draft)?;
    let mut job = ctx
        .store
        .job(id)
        .map_err(store_failure)?
        .filter(|job| job.employer == user.id)
        .ok_or_else(|| AppError::not_found("job"))?;
    job.draft = draft;
    job.updated_at = Utc::now();
    ctx.store.update_job(job.clone()).map_err(store_failure)?;

    Ok(envelope("job updated", job))
}

#[derive(Debug, Deserialize)]
struct JobStatusRequest {
    status: String,
}

async fn update_job_status(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<JobId>,
    Json(payload): Json<JobStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status = JobStatus::parse(&payload.status).ok_or_else(|| {
        AppError::validation(vec![FieldError::new(
            "status",
            "status must be open, closed, or draft",
        )])
    })?;

    let mut job = ctx
        .store
        .job(id)
        .map_err(store_failure)?
        .filter(|job| job.employer == user.id)
        .ok_or_else(|| AppError::not_found("job"))?;
    job.draft.status = status;
    job.updated_at = Utc::now();
    ctx.store.update_job(job.clone()).map_err(store_failure)?;

    Ok(envelope("job status updated", job))
}

async fn delete_job(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<JobId>,
) -> Result<Json<Value>, AppError> {
    ctx.engine.delete_job(id, user.id)?;
    Ok(envelope("job deleted", Value::Null))
}

// ---- applicants -----------------------------------------------------------

async fn applicants(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<JobId>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let owned = ctx
        .store
        .job(id)
        .map_err(store_failure)?
        .filter(|job| job.employer == user.id)
        .is_some();
    if !owned {
        return Err(AppError::not_found("job"));
    }

    let applications = ctx.store.applications_by_job(id).map_err(store_failure)?;
    Ok(paginated("applicants", page.slice(applications)))
}

#[derive(Debug, Deserialize)]
struct ApplicationStatusRequest {
    status: String,
    #[serde(default)]
    notes: Option<String>,
}

async fn update_application_status(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
    Path(id): Path<ApplicationId>,
    Json(payload): Json<ApplicationStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status = ApplicationStatus::parse(&payload.status).ok_or_else(|| {
        AppError::validation(vec![FieldError::new(
            "status",
            "unknown application status",
        )])
    })?;

    let application = ctx
        .engine
        .update_status(id, user.id, status, payload.notes)?;
    Ok(envelope("application status updated", application))
}

// ---- stats ----------------------------------------------------------------

async fn stats(
    State(ctx): State<ApiContext>,
    Employer(user): Employer,
) -> Result<Json<Value>, AppError> {
    let jobs = ctx.store.jobs_by_employer(user.id).map_err(store_failure)?;
    let applications = ctx
        .store
        .applications_by_employer(user.id)
        .map_err(store_failure)?;

    let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
    for application in &applications {
        *by_status.entry(application.status.label()).or_default() += 1;
    }

    Ok(envelope(
        "stats",
        json!({
            "total_jobs": jobs.len(),
            "open_jobs": jobs.iter().filter(|job| job.is_open()).count(),
            "total_views": jobs.iter().map(|job| job.total_views).sum::<i64>(),
            "total_applications": applications
                .iter()
                .filter(|a| a.counts_toward_total())
                .count(),
            "applications_by_status": by_status,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, employer_with_company, post_open_job, register, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn posting_a_job_requires_a_company() {
        let (_ctx, app) = app();
        let token = register(&app, "Erin Vale", "erin@vale.test", "employer").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employer/jobs",
            Some(&token),
            Some(json!({
                "title": "Backend Engineer",
                "description": "Own the job-board services.",
                "requirements": null,
                "location": {},
                "salary": {},
                "work_mode": "remote",
                "job_type": "fulltime",
                "experience_level": null,
                "category": null,
                "skills": [],
                "status": "open",
                "deadline": null,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "create a company profile before posting jobs");
    }

    #[tokio::test]
    async fn one_company_per_employer() {
        let (_ctx, app) = app();
        let (token, _company) = employer_with_company(&app, "erin@vale.test").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employer/company",
            Some(&token),
            Some(json!({ "name": "Second Venture" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "company profile already exists");
    }

    #[tokio::test]
    async fn seekers_cannot_reach_employer_routes() {
        let (_ctx, app) = app();
        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;

        let (status, _body) =
            send(&app, Method::GET, "/api/employer/jobs", Some(&seeker), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn applicant_review_moves_through_the_pipeline() {
        let (_ctx, app) = app();
        let (employer, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let (_status, body) = send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;
        let application_id = body["data"]["id"].as_str().expect("application id").to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/employer/jobs/{job_id}/applicants"),
            Some(&employer),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().expect("applicant list").len(), 1);

        let status_uri = format!("/api/employer/applications/{application_id}/status");
        let (status, body) = send(
            &app,
            Method::PATCH,
            &status_uri,
            Some(&employer),
            Some(json!({ "status": "reviewing", "notes": "Strong CV" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "reviewing");
        assert_eq!(body["data"]["employer_notes"], "Strong CV");

        // Terminal state, then no further updates.
        let (status, _body) = send(
            &app,
            Method::PATCH,
            &status_uri,
            Some(&employer),
            Some(json!({ "status": "accepted" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &status_uri,
            Some(&employer),
            Some(json!({ "status": "rejected" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "cannot move application from accepted to rejected"
        );
    }

    #[tokio::test]
    async fn closing_a_job_blocks_new_applications() {
        let (_ctx, app) = app();
        let (employer, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer, "Backend Engineer").await;

        let (status, _body) = send(
            &app,
            Method::PATCH,
            &format!("/api/employer/jobs/{job_id}/status"),
            Some(&employer),
            Some(json!({ "status": "closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "this job is no longer accepting applications");
    }

    #[tokio::test]
    async fn stats_reflect_jobs_and_applications() {
        let (_ctx, app) = app();
        let (employer, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer, "Backend Engineer").await;
        post_open_job(&app, &employer, "Data Analyst").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;

        let (status, body) =
            send(&app, Method::GET, "/api/employer/stats", Some(&employer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_jobs"], 2);
        assert_eq!(body["data"]["open_jobs"], 2);
        assert_eq!(body["data"]["total_applications"], 1);
        assert_eq!(body["data"]["applications_by_status"]["pending"], 1);
    }

    #[tokio::test]
    async fn deleting_a_job_cascades_its_applications() {
        let (ctx, app) = app();
        let (employer, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;

        let (status, _body) = send(
            &app,
            Method::DELETE,
            &format!("/api/employer/jobs/{job_id}"),
            Some(&employer),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        use jobmatch::store::ApplicationStore;
        let remaining = ctx.store.applications().expect("list runs");
        assert!(remaining.is_empty());
    }
}
