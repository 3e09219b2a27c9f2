//! Request-side auth guards.
//!
//! `AuthUser` resolves the bearer token to a live account; the role wrappers
//! narrow it further so handlers state their access rule in the signature.

use crate::infra::{store_failure, ApiContext};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jobmatch::domain::{Role, UserRecord};
use jobmatch::error::AppError;
use jobmatch::store::UserStore;

/// Any authenticated, active account.
pub(crate) struct AuthUser(pub(crate) UserRecord);

#[axum::async_trait]
impl FromRequestParts<ApiContext> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ApiContext,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::unauthenticated)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::unauthenticated)?;

        let claims = ctx
            .tokens
            .verify(token)
            .map_err(|_| AppError::unauthenticated())?;
        let user_id = claims.user_id().ok_or_else(AppError::unauthenticated)?;

        let user = ctx
            .store
            .user(user_id)
            .map_err(store_failure)?
            .ok_or_else(AppError::unauthenticated)?;

        // A deactivated account keeps a valid token until expiry; reject it
        // here rather than at login only.
        if !user.is_active {
            return Err(AppError::forbidden());
        }

        Ok(AuthUser(user))
    }
}

macro_rules! role_guard {
    ($(#[$doc:meta])* $name:ident, $role:pat) => {
        $(#[$doc])*
        pub(crate) struct $name(pub(crate) UserRecord);

        #[axum::async_trait]
        impl FromRequestParts<ApiContext> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                ctx: &ApiContext,
            ) -> Result<Self, Self::Rejection> {
                let AuthUser(user) = AuthUser::from_request_parts(parts, ctx).await?;
                if !matches!(user.role, $role) {
                    return Err(AppError::forbidden());
                }
                Ok(Self(user))
            }
        }
    };
}

role_guard!(
    /// An authenticated job seeker.
    Seeker,
    Role::JobSeeker
);
role_guard!(
    /// An authenticated employer.
    Employer,
    Role::Employer
);
role_guard!(
    /// An authenticated admin.
    Admin,
    Role::Admin
);
