//! HTTP surface: the ops endpoints plus the role-scoped API routers.
//!
//! Every API response uses the `{ success, message, data }` envelope;
//! paginated payloads add a `pagination` block alongside `data`.

mod admin;
mod auth;
mod employer;
mod seeker;

use crate::infra::{ApiContext, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use jobmatch::domain::{CompanyId, Role, UserId, UserRecord, UserSettings};
use jobmatch::search::Page;
use serde::Serialize;
use serde_json::{json, Value};

pub(crate) fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .nest("/api/auth", auth::router())
        .nest("/api/js", seeker::router())
        .nest("/api/employer", employer::router())
        .nest("/api/admin", admin::router())
        .with_state(ctx)
}

pub(crate) fn envelope(message: &str, data: impl Serialize) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

pub(crate) fn paginated<T: Serialize>(message: &str, page: Page<T>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": page.data,
        "pagination": page.pagination,
    }))
}

/// User payload with the password digest stripped.
#[derive(Debug, Serialize)]
pub(crate) struct UserView {
    pub(crate) id: UserId,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) is_active: bool,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) skills: Vec<String>,
    pub(crate) resume_ids: Vec<String>,
    pub(crate) settings: UserSettings,
    pub(crate) company: Option<CompanyId>,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserView {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            location: user.location,
            summary: user.summary,
            skills: user.skills,
            resume_ids: user.resume_ids,
            settings: user.settings,
            company: user.company,
            created_at: user.created_at,
        }
    }
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::api_router;
    use crate::infra::{test_context, ApiContext};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    pub(crate) fn app() -> (ApiContext, Router) {
        let ctx = test_context();
        (ctx.clone(), api_router(ctx))
    }

    pub(crate) async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        };

        let response = app.clone().oneshot(request).await.expect("handler runs");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };

        (status, value)
    }

    /// Register an account and return its bearer token.
    pub(crate) async fn register(app: &Router, name: &str, email: &str, role: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": "hunter2abc",
                "role": role,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token issued")
            .to_string()
    }

    /// Register an employer, create its company, and return the token and
    /// company id.
    pub(crate) async fn employer_with_company(app: &Router, email: &str) -> (String, String) {
        let token = register(app, "Erin Vale", email, "employer").await;
        let (status, body) = send(
            app,
            Method::POST,
            "/api/employer/company",
            Some(&token),
            Some(serde_json::json!({ "name": "Vale Robotics" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "company create failed: {body}");
        let company_id = body["data"]["id"].as_str().expect("company id").to_string();
        (token, company_id)
    }

    /// Post an open job under an employer token and return the job id.
    pub(crate) async fn post_open_job(app: &Router, token: &str, title: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/employer/jobs",
            Some(token),
            Some(serde_json::json!({
                "title": title,
                "description": "Own the job-board services.",
                "requirements": null,
                "location": { "city": "Lisbon", "country": "PT", "is_remote": false },
                "salary": { "min": 70000, "max": 90000, "currency": "EUR", "is_negotiable": false },
                "work_mode": "remote",
                "job_type": "fulltime",
                "experience_level": "senior",
                "category": "engineering",
                "skills": ["rust"],
                "status": "open",
                "deadline": null,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "job post failed: {body}");
        body["data"]["id"].as_str().expect("job id").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{app, send};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (_ctx, app) = app();
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn api_routes_require_a_token() {
        let (_ctx, app) = app();
        let (status, body) = send(&app, Method::GET, "/api/js/jobs/search", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }
}
