//! Outbound mail boundary.
//!
//! The lifecycle engine treats mail as fire-and-forget: a [`Mailer`] failure
//! is logged by the caller and never becomes the operation's error.

use serde::{Deserialize, Serialize};

/// Rendered message handed to whatever transport is wired in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait describing the outbound mail hook.
pub trait Mailer: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Drops every message; used when no sender address is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMailer;

impl Mailer for NullMailer {
    fn send(&self, _message: EmailMessage) -> Result<(), MailError> {
        Ok(())
    }
}

/// Message bodies for the lifecycle side effects.
pub mod templates {
    use super::EmailMessage;

    pub fn welcome(to: &str, name: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Welcome to JobMatch!".to_string(),
            html: format!(
                "<h1>Welcome to JobMatch, {name}!</h1>\
                 <p>Thank you for registering. Start exploring job opportunities \
                 or post your first job today!</p>"
            ),
        }
    }

    pub fn application_received(to: &str, job_title: &str, company_name: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Application Received".to_string(),
            html: format!(
                "<h1>Application Received</h1>\
                 <p>Your application for <strong>{job_title}</strong> at \
                 <strong>{company_name}</strong> has been received.</p>\
                 <p>We'll notify you once the employer reviews your application.</p>"
            ),
        }
    }

    pub fn new_applicant(to: &str, job_title: &str, applicant_name: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "New Application Received".to_string(),
            html: format!(
                "<h1>New Application</h1>\
                 <p><strong>{applicant_name}</strong> has applied for your job \
                 posting: <strong>{job_title}</strong></p>\
                 <p>Login to review the application.</p>"
            ),
        }
    }

    pub fn status_update(to: &str, job_title: &str, status: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Application Status Update".to_string(),
            html: format!(
                "<h1>Application Status Updated</h1>\
                 <p>Your application for <strong>{job_title}</strong> has been \
                 updated to: <strong>{status}</strong></p>"
            ),
        }
    }
}
