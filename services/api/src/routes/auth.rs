use super::{envelope, UserView};
use crate::extract::AuthUser;
use crate::infra::{credential_failure, store_failure, ApiContext};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use jobmatch::auth::{hash_password, verify_password};
use jobmatch::domain::{Role, UserRecord};
use jobmatch::error::{AppError, FieldError};
use jobmatch::store::UserStore;
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn router() -> Router<ApiContext> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/password", put(change_password))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    role: String,
}

/// Admin accounts come from the seed script, never from registration.
fn validate_registration(payload: &RegisterRequest) -> Result<Role, AppError> {
    let mut errors = Vec::new();

    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if !payload.email.contains('@') {
        errors.push(FieldError::new("email", "a valid email address is required"));
    }
    if payload.password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "password must be at least 8 characters",
        ));
    }
    let role = match Role::parse(&payload.role) {
        Some(Role::Admin) | None => {
            errors.push(FieldError::new("role", "role must be job_seeker or employer"));
            None
        }
        Some(role) => Some(role),
    };

    match role {
        Some(role) if errors.is_empty() => Ok(role),
        _ => Err(AppError::validation(errors)),
    }
}

async fn register(
    State(ctx): State<ApiContext>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = validate_registration(&payload)?;

    let digest = hash_password(&payload.password).map_err(credential_failure)?;
    let user = UserRecord::new(
        payload.email.trim().to_lowercase(),
        digest,
        role,
        payload.name.trim(),
    );
    let user = ctx.engine.register(user)?;
    let token = ctx.tokens.issue(user.id, user.role).map_err(credential_failure)?;

    Ok((
        StatusCode::CREATED,
        envelope(
            "registered",
            json!({ "token": token, "user": UserView::from(user) }),
        ),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(ctx): State<ApiContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = ctx
        .store
        .user_by_email(payload.email.trim().to_lowercase().as_str())
        .map_err(store_failure)?
        .ok_or_else(AppError::unauthenticated)?;

    if !verify_password(&payload.password, &user.password_digest) {
        return Err(AppError::unauthenticated());
    }
    if !user.is_active {
        return Err(AppError::forbidden());
    }

    let token = ctx.tokens.issue(user.id, user.role).map_err(credential_failure)?;

    Ok(envelope(
        "logged in",
        json!({ "token": token, "user": UserView::from(user) }),
    ))
}

async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    envelope("profile", UserView::from(user))
}

#[derive(Debug, Deserialize)]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

async fn change_password(
    State(ctx): State<ApiContext>,
    AuthUser(mut user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.new_password.len() < 8 {
        return Err(AppError::validation(vec![FieldError::new(
            "new_password",
            "password must be at least 8 characters",
        )]));
    }
    if !verify_password(&payload.current_password, &user.password_digest) {
        return Err(AppError::unauthenticated());
    }

    user.password_digest = hash_password(&payload.new_password).map_err(credential_failure)?;
    user.updated_at = Utc::now();
    ctx.store.update_user(user).map_err(store_failure)?;

    Ok(envelope("password updated", Value::Null))
}
