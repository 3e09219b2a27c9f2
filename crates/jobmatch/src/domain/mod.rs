//! Entity records held by the document store.
//!
//! References between records are plain ids with no enforced referential
//! integrity; ownership rules (a seeker owns their applications, an employer
//! owns their jobs) are checked by the lifecycle engine, not the store.

mod application;
mod company;
mod engagement;
mod job;
mod notification;
mod report;
mod user;

pub use application::{ApplicationRecord, ApplicationStatus};
pub use company::{CompanyProfile, CompanyRecord, VerificationStatus};
pub use engagement::{AlertFrequency, FollowRecord, JobAlertRecord, SavedJobRecord};
pub use job::{ExperienceLevel, JobDraft, JobLocation, JobRecord, JobStatus, JobType, SalaryRange, WorkMode};
pub use notification::{NotificationKind, NotificationRecord};
pub use report::{ReportRecord, ReportStatus, ReportTarget};
pub use user::{Role, UserRecord, UserSettings};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse(raw: &str) -> Option<Self> {
                Uuid::parse_str(raw).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Identifier for a registered user (seeker, employer, or admin).
    UserId
);
entity_id!(CompanyId);
entity_id!(JobId);
entity_id!(ApplicationId);
entity_id!(NotificationId);
entity_id!(SavedJobId);
entity_id!(JobAlertId);
entity_id!(ReportId);
