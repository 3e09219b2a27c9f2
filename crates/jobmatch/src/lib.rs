//! Core library for the JobMatch job-board backend.
//!
//! The interesting pieces live in [`lifecycle`] (legal application state
//! transitions and their counter/notification side effects) and
//! [`reconcile`] (offline recomputation of the denormalized counters the
//! live paths maintain best-effort). Everything else is the plumbing those
//! two need: typed domain records, store traits with an in-memory
//! implementation, auth primitives, and search helpers.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod reconcile;
pub mod search;
pub mod store;
pub mod telemetry;
