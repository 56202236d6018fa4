//! Joined read models returned by the listing operations.
//!
//! Stored records only hold identifiers; the expansions below are assembled at the
//! query boundary so no nested document ever leaks into the stored schema.

use serde::Serialize;

use super::domain::{Domain, Job, JobApplication, JobSeeker};

/// A domain annotated with the jobs visible to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainListing<J> {
    #[serde(flatten)]
    pub domain: Domain,
    pub jobs: Vec<J>,
}

/// An application joined with the applicant it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantEntry {
    #[serde(flatten)]
    pub application: JobApplication,
    pub applicant: Option<JobSeeker>,
}

/// A job annotated with a filtered set of its applications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobWithApplicants {
    #[serde(flatten)]
    pub job: Job,
    pub applications: Vec<ApplicantEntry>,
}

/// An application joined with the job it targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: JobApplication,
    pub job_details: Option<Job>,
}

/// What a job seeker sees on their own profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeekerProfile {
    /// Not selected yet: every application with its job details.
    Applying {
        seeker: JobSeeker,
        applications: Vec<ApplicationWithJob>,
    },
    /// Selected: only the job they were selected into.
    Selected {
        seeker: JobSeeker,
        selected_in: Option<Job>,
    },
}

impl SeekerProfile {
    pub fn seeker(&self) -> &JobSeeker {
        match self {
            SeekerProfile::Applying { seeker, .. } | SeekerProfile::Selected { seeker, .. } => {
                seeker
            }
        }
    }
}

/// Confirmation returned by a successful selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReceipt {
    pub message: &'static str,
    pub application: JobApplication,
    pub remaining_vacancy: u32,
}
