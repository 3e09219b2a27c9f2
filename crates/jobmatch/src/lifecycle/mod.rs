//! Application lifecycle engine.
//!
//! Enforces the legal state transitions for jobs and applications and
//! triggers the side effects each transition owes: denormalized counter
//! adjustments, notification records, and outbound mail. Side effects run
//! in order, best effort, with no compensation when a later step fails;
//! mail dispatch in particular is fire-and-forget and only ever logged.

mod service;

#[cfg(test)]
mod tests;

pub use service::LifecycleEngine;

use crate::error::AppError;
use crate::store::StoreError;

/// Error raised by the lifecycle engine.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Entity absent, or present but not owned by the caller.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Duplicate resource or illegal state transition.
    #[error("{0}")]
    Conflict(String),
    /// Store failure unrelated to the operation's contract.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<LifecycleError> for AppError {
    fn from(value: LifecycleError) -> Self {
        match value {
            LifecycleError::NotFound(what) => AppError::not_found(what),
            LifecycleError::Conflict(message) => AppError::conflict(message),
            LifecycleError::Store(err) => {
                AppError::Server(axum::Error::new(err))
            }
        }
    }
}
