mod common;
mod reconciliation;
