//! Job-seeker surface: search, applications, bookmarks, follows,
//! notifications, alerts, and profile settings.

use super::{envelope, paginated, UserView};
use crate::extract::Seeker;
use crate::infra::{store_failure, ApiContext};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use chrono::Utc;
use jobmatch::domain::{
    AlertFrequency, ApplicationId, CompanyId, JobAlertId, JobAlertRecord, JobId, NotificationId,
    SavedJobId, UserSettings,
};
use jobmatch::error::{AppError, FieldError};
use jobmatch::search::{
    recommended_jobs, search_companies, search_jobs, CompanySearchQuery, JobSearchQuery, Pagination,
};
use jobmatch::store::{
    ApplicationStore, CompanyStore, FollowStore, JobAlertStore, JobStore, NotificationStore,
    SavedJobStore, StoreError, UserStore,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn router() -> Router<ApiContext> {
    Router::new()
        .route("/jobs/search", get(search))
        .route("/jobs/recommended", get(recommended))
        .route("/jobs/:id", get(job_detail))
        .route("/jobs/:id/apply", post(apply))
        .route("/jobs/:id/save", post(save_job))
        .route("/saved-jobs", get(saved_jobs))
        .route("/saved-jobs/:id", delete(unsave_job))
        .route("/applications", get(applications))
        .route("/applications/:id", delete(withdraw))
        .route("/companies/search", get(company_search))
        .route("/companies/following", get(following_companies))
        .route("/companies/:id", get(company_detail))
        .route("/companies/:id/follow", post(follow).delete(unfollow))
        .route("/notifications", get(notifications))
        .route("/notifications/read-all", patch(read_all_notifications))
        .route("/notifications/:id/read", patch(read_notification))
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/:id", put(update_alert).delete(delete_alert))
        .route("/alerts/:id/toggle", patch(toggle_alert))
        .route("/profile", put(update_profile))
        .route("/settings", get(settings).put(update_settings))
}

// ---- jobs -----------------------------------------------------------------

async fn search(
    State(ctx): State<ApiContext>,
    Seeker(_user): Seeker,
    Query(query): Query<JobSearchQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let page = search_jobs(ctx.store.as_ref(), &query, page).map_err(store_failure)?;
    Ok(paginated("jobs", page))
}

async fn recommended(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let page = recommended_jobs(ctx.store.as_ref(), &user, page).map_err(store_failure)?;
    Ok(paginated("recommended jobs", page))
}

async fn job_detail(
    State(ctx): State<ApiContext>,
    Seeker(_user): Seeker,
    Path(id): Path<JobId>,
) -> Result<Json<Value>, AppError> {
    let job = ctx
        .store
        .job(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("job"))?;
    ctx.store.bump_total_views(job.id).map_err(store_failure)?;

    let company = ctx.store.company(job.company).map_err(store_failure)?;
    Ok(envelope("job", json!({ "job": job, "company": company })))
}

#[derive(Debug, Default, Deserialize)]
struct ApplyRequest {
    #[serde(default)]
    resume_id: Option<String>,
    #[serde(default)]
    cover_letter: Option<String>,
}

async fn apply(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<JobId>,
    Json(payload): Json<ApplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let application = ctx
        .engine
        .apply(id, &user, payload.resume_id, payload.cover_letter)?;
    Ok((
        StatusCode::CREATED,
        envelope("application submitted", application),
    ))
}

// ---- applications ---------------------------------------------------------

async fn applications(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let records = ctx
        .store
        .applications_by_seeker(user.id)
        .map_err(store_failure)?;
    Ok(paginated("applications", page.slice(records)))
}

async fn withdraw(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<ApplicationId>,
) -> Result<Json<Value>, AppError> {
    let application = ctx.engine.withdraw(id, user.id)?;
    Ok(envelope("application withdrawn", application))
}

// ---- saved jobs -----------------------------------------------------------

async fn save_job(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<JobId>,
) -> Result<impl IntoResponse, AppError> {
    let saved = ctx.engine.save_job(user.id, id)?;
    Ok((StatusCode::CREATED, envelope("job saved", saved)))
}

async fn saved_jobs(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let saved = ctx.store.saved_jobs_for(user.id).map_err(store_failure)?;
    let mut entries = Vec::with_capacity(saved.len());
    for record in saved {
        let job = ctx.store.job(record.job).map_err(store_failure)?;
        entries.push(json!({ "saved": record, "job": job }));
    }
    Ok(paginated("saved jobs", page.slice(entries)))
}

async fn unsave_job(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<SavedJobId>,
) -> Result<Json<Value>, AppError> {
    ctx.engine.unsave_job(id, user.id)?;
    Ok(envelope("saved job removed", Value::Null))
}

// ---- companies ------------------------------------------------------------

async fn company_search(
    State(ctx): State<ApiContext>,
    Seeker(_user): Seeker,
    Query(query): Query<CompanySearchQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let page = search_companies(ctx.store.as_ref(), &query, page).map_err(store_failure)?;
    Ok(paginated("companies", page))
}

async fn company_detail(
    State(ctx): State<ApiContext>,
    Seeker(_user): Seeker,
    Path(id): Path<CompanyId>,
) -> Result<Json<Value>, AppError> {
    let company = ctx
        .store
        .company(id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("company"))?;
    let jobs: Vec<_> = ctx
        .store
        .jobs_by_company(company.id)
        .map_err(store_failure)?
        .into_iter()
        .filter(|job| job.is_open())
        .collect();

    Ok(envelope("company", json!({ "company": company, "open_jobs": jobs })))
}

async fn follow(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<CompanyId>,
) -> Result<Json<Value>, AppError> {
    ctx.engine.follow_company(user.id, id)?;
    Ok(envelope("company followed", Value::Null))
}

async fn following_companies(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let follows = ctx.store.follows_for(user.id).map_err(store_failure)?;
    let mut entries = Vec::with_capacity(follows.len());
    for record in follows {
        let company = ctx.store.company(record.company).map_err(store_failure)?;
        entries.push(json!({ "follow": record, "company": company }));
    }
    Ok(paginated("following companies", page.slice(entries)))
}

async fn unfollow(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<CompanyId>,
) -> Result<Json<Value>, AppError> {
    ctx.engine.unfollow_company(user.id, id)?;
    Ok(envelope("company unfollowed", Value::Null))
}

// ---- notifications --------------------------------------------------------

async fn notifications(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let records = ctx
        .store
        .notifications_for(user.id)
        .map_err(store_failure)?;
    Ok(paginated("notifications", page.slice(records)))
}

async fn read_notification(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<NotificationId>,
) -> Result<Json<Value>, AppError> {
    let notification = ctx
        .store
        .mark_notification_read(id, user.id)
        .map_err(|err| match err {
            StoreError::NotFound => AppError::not_found("notification"),
            other => store_failure(other),
        })?;
    Ok(envelope("notification read", notification))
}

async fn read_all_notifications(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
) -> Result<Json<Value>, AppError> {
    let updated = ctx
        .store
        .mark_all_notifications_read(user.id)
        .map_err(store_failure)?;
    Ok(envelope("notifications read", json!({ "updated": updated })))
}

// ---- job alerts -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AlertRequest {
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    job_types: Vec<String>,
    #[serde(default)]
    salary_min: Option<u64>,
    #[serde(default)]
    frequency: Option<AlertFrequency>,
}

impl AlertRequest {
    fn apply_to(self, alert: &mut JobAlertRecord) {
        alert.name = self.name;
        alert.keywords = self.keywords;
        alert.location = self.location;
        alert.job_types = self.job_types;
        alert.salary_min = self.salary_min;
        if let Some(frequency) = self.frequency {
            alert.frequency = frequency;
        }
    }
}

async fn list_alerts(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
) -> Result<Json<Value>, AppError> {
    let alerts = ctx.store.alerts_for(user.id).map_err(store_failure)?;
    Ok(envelope("job alerts", alerts))
}

async fn create_alert(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Json(payload): Json<AlertRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation(vec![FieldError::new(
            "name",
            "alert name is required",
        )]));
    }

    let mut alert = JobAlertRecord::new(user.id, payload.name.clone());
    payload.apply_to(&mut alert);
    ctx.store.insert_alert(alert.clone()).map_err(store_failure)?;

    Ok((StatusCode::CREATED, envelope("job alert created", alert)))
}

async fn update_alert(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<JobAlertId>,
    Json(payload): Json<AlertRequest>,
) -> Result<Json<Value>, AppError> {
    let mut alert = ctx
        .store
        .alert(id, user.id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("job alert"))?;
    payload.apply_to(&mut alert);
    ctx.store.update_alert(alert.clone()).map_err(store_failure)?;

    Ok(envelope("job alert updated", alert))
}

async fn toggle_alert(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<JobAlertId>,
) -> Result<Json<Value>, AppError> {
    let mut alert = ctx
        .store
        .alert(id, user.id)
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found("job alert"))?;
    alert.is_active = !alert.is_active;
    ctx.store.update_alert(alert.clone()).map_err(store_failure)?;

    Ok(envelope("job alert toggled", alert))
}

async fn delete_alert(
    State(ctx): State<ApiContext>,
    Seeker(user): Seeker,
    Path(id): Path<JobAlertId>,
) -> Result<Json<Value>, AppError> {
    ctx.store.delete_alert(id, user.id).map_err(|err| match err {
        StoreError::NotFound => AppError::not_found("job alert"),
        other => store_failure(other),
    })?;
    Ok(envelope("job alert deleted", Value::Null))
}

// ---- profile and settings -------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProfileRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    skills: Option<Vec<String>>,
}

async fn update_profile(
    State(ctx): State<ApiContext>,
    Seeker(mut user): Seeker,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(name) = payload.name {
        let mut parts = name.split_whitespace();
        user.first_name = parts.next().unwrap_or_default().to_string();
        user.last_name = parts.collect::<Vec<_>>().join(" ");
    }
    if let Some(phone) = payload.phone {
        user.phone = Some(phone);
    }
    if let Some(location) = payload.location {
        user.location = Some(location);
    }
    if let Some(summary) = payload.summary {
        user.summary = Some(summary);
    }
    if let Some(skills) = payload.skills {
        user.skills = skills;
    }
    user.updated_at = Utc::now();
    ctx.store.update_user(user.clone()).map_err(store_failure)?;

    Ok(envelope("profile updated", UserView::from(user)))
}

async fn settings(Seeker(user): Seeker) -> Json<Value> {
    envelope("settings", user.settings)
}

async fn update_settings(
    State(ctx): State<ApiContext>,
    Seeker(mut user): Seeker,
    Json(payload): Json<UserSettings>,
) -> Result<Json<Value>, AppError> {
    user.settings = payload;
    user.updated_at = Utc::now();
    ctx.store.update_user(user.clone()).map_err(store_failure)?;

    Ok(envelope("settings updated", user.settings))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, employer_with_company, post_open_job, register, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn search_filters_and_paginates_open_jobs() {
        let (_ctx, app) = app();
        let (employer_token, _company) = employer_with_company(&app, "erin@vale.test").await;
        post_open_job(&app, &employer_token, "Backend Engineer").await;
        post_open_job(&app, &employer_token, "Data Analyst").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/js/jobs/search?keyword=backend",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body["data"].as_array().expect("job list");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["draft"]["title"], "Backend Engineer");
        assert_eq!(body["pagination"]["total_items"], 1);
    }

    #[tokio::test]
    async fn apply_and_withdraw_over_http() {
        let (_ctx, app) = app();
        let (employer_token, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer_token, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({ "cover_letter": "Hello!" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let application_id = body["data"]["id"].as_str().expect("application id").to_string();
        assert_eq!(body["data"]["status"], "pending");

        // Duplicate application comes back as a conflict.
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "you have already applied to this job");

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/js/applications/{application_id}"),
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "withdrawn");
    }

    #[tokio::test]
    async fn job_detail_bumps_the_view_counter() {
        let (ctx, app) = app();
        let (employer_token, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer_token, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let uri = format!("/api/js/jobs/{job_id}");
        send(&app, Method::GET, &uri, Some(&seeker), None).await;
        let (status, body) = send(&app, Method::GET, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["job"]["total_views"], 1, "second read sees the first bump");
        let _ = ctx;
    }

    #[tokio::test]
    async fn saved_jobs_reject_duplicates() {
        let (_ctx, app) = app();
        let (employer_token, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer_token, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let uri = format!("/api/js/jobs/{job_id}/save");
        let (status, _body) = send(&app, Method::POST, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "job already saved");

        let (status, body) =
            send(&app, Method::GET, "/api/js/saved-jobs", Some(&seeker), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().expect("saved list").len(), 1);
    }

    #[tokio::test]
    async fn follow_and_unfollow_company() {
        let (_ctx, app) = app();
        let (_employer_token, company_id) = employer_with_company(&app, "erin@vale.test").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        let uri = format!("/api/js/companies/{company_id}/follow");
        let (status, _body) = send(&app, Method::POST, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "already following this company");

        let detail = format!("/api/js/companies/{company_id}");
        let (_status, body) = send(&app, Method::GET, &detail, Some(&seeker), None).await;
        assert_eq!(body["data"]["company"]["total_followers"], 1);

        let (status, _body) = send(&app, Method::DELETE, &uri, Some(&seeker), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn following_list_tracks_follow_state() {
        let (_ctx, app) = app();
        let (_employer_token, company_id) = employer_with_company(&app, "erin@vale.test").await;
        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/js/companies/following",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().expect("list").len(), 0);

        let follow_uri = format!("/api/js/companies/{company_id}/follow");
        send(&app, Method::POST, &follow_uri, Some(&seeker), None).await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/js/companies/following",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let list = body["data"].as_array().expect("list");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["company"]["profile"]["name"], "Vale Robotics");
        assert_eq!(body["pagination"]["total_items"], 1);

        send(&app, Method::DELETE, &follow_uri, Some(&seeker), None).await;
        let (_status, body) = send(
            &app,
            Method::GET,
            "/api/js/companies/following",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().expect("list").len(), 0);
    }

    #[tokio::test]
    async fn notification_feed_is_scoped_to_the_recipient() {
        let (_ctx, app) = app();
        let (employer_token, _company) = employer_with_company(&app, "erin@vale.test").await;
        let job_id = post_open_job(&app, &employer_token, "Backend Engineer").await;

        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;
        send(
            &app,
            Method::POST,
            &format!("/api/js/jobs/{job_id}/apply"),
            Some(&seeker),
            Some(json!({})),
        )
        .await;

        // The apply notification goes to the employer, not the seeker.
        let (_status, body) = send(
            &app,
            Method::GET,
            "/api/js/notifications",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().expect("list").len(), 0);

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/js/notifications/read-all",
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], 0);
    }

    #[tokio::test]
    async fn job_alert_lifecycle() {
        let (_ctx, app) = app();
        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/js/alerts",
            Some(&seeker),
            Some(json!({
                "name": "Rust jobs",
                "keywords": ["rust"],
                "frequency": "weekly",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let alert_id = body["data"]["id"].as_str().expect("alert id").to_string();
        assert_eq!(body["data"]["frequency"], "weekly");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/js/alerts/{alert_id}/toggle"),
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_active"], false);

        let (status, _body) = send(
            &app,
            Method::DELETE,
            &format!("/api/js/alerts/{alert_id}"),
            Some(&seeker),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_status, body) =
            send(&app, Method::GET, "/api/js/alerts", Some(&seeker), None).await;
        assert_eq!(body["data"].as_array().expect("list").len(), 0);
    }

    #[tokio::test]
    async fn profile_and_settings_update() {
        let (_ctx, app) = app();
        let seeker = register(&app, "Ana Silva", "ana@seeker.test", "job_seeker").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/js/profile",
            Some(&seeker),
            Some(json!({ "location": "Lisbon", "skills": ["rust", "sql"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["location"], "Lisbon");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/js/settings",
            Some(&seeker),
            Some(json!({
                "email_notifications": false,
                "job_alerts": true,
                "profile_public": false,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email_notifications"], false);
    }
}
