use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(raw.trim()).map(Self)
            }
        }
    };
}

identifier!(
    /// Identifier of a job domain.
    DomainId
);
identifier!(
    /// Identifier of a job posting.
    JobId
);
identifier!(
    /// Identifier of a registered job seeker.
    JobSeekerId
);
identifier!(
    /// Identifier of a job application.
    ApplicationId
);
identifier!(
    /// Identifier of a registered organisation.
    OrganisationId
);

/// A named category jobs are grouped under. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
}

/// A job posting. `vacancy` counts the seats still open and only ever moves down on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub name: String,
    #[serde(rename = "orgId")]
    pub organisation_id: OrganisationId,
    #[serde(rename = "orgName")]
    pub organisation_name: String,
    pub domain_name: String,
    pub skill_req: String,
    pub date_added: DateTime<Utc>,
    pub ctc: u64,
    pub vacancy: u32,
}

impl Job {
    pub const fn is_open(&self) -> bool {
        self.vacancy > 0
    }
}

/// Job posting fields supplied by an organisation; the owner is taken from the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub name: String,
    pub org_name: String,
    pub domain_name: String,
    pub skill_req: String,
    pub ctc: u64,
    pub vacancy: u32,
}

/// A registered job seeker. `job_selected` stays `None` until an organisation selects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeeker {
    pub id: JobSeekerId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub skill: String,
    pub job_selected: Option<JobId>,
}

impl JobSeeker {
    pub const fn is_selected(&self) -> bool {
        self.job_selected.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeekerRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub skill: String,
}

/// A seeker's application to a job. `selected` flips false to true once and never back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_seeker_id: JobSeekerId,
    pub selected: bool,
}

impl JobApplication {
    pub fn pending(job_id: JobId, job_seeker_id: JobSeekerId) -> Self {
        Self {
            id: ApplicationId::generate(),
            job_id,
            job_seeker_id,
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organisation {
    pub id: OrganisationId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrganisationRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}
