//! Document-store ports, one per collection.
//!
//! Listing methods return documents in natural (insertion) order. The conditional
//! primitives (`claim_selection`, `take_vacancy`, `mark_application_selected`) must be
//! atomic per document: they test and write under the same guard so concurrent callers
//! cannot both succeed.

use super::domain::{
    ApplicationId, Domain, Job, JobApplication, JobId, JobSeeker, JobSeekerId, Organisation,
    OrganisationId,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique key is already taken.
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait DomainRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the name is taken.
    fn insert_domain(&self, domain: Domain) -> Result<Domain, RepositoryError>;
    fn find_domain(&self, name: &str) -> Result<Option<Domain>, RepositoryError>;
    fn domains(&self) -> Result<Vec<Domain>, RepositoryError>;
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    /// Decrement the vacancy only while it is positive. Returns the new count, or `None`
    /// when no seat was left.
    fn take_vacancy(&self, id: &JobId) -> Result<Option<u32>, RepositoryError>;
    /// Give back a seat taken by [`JobRepository::take_vacancy`].
    fn restore_vacancy(&self, id: &JobId) -> Result<(), RepositoryError>;
}

pub trait JobSeekerRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the email is taken.
    fn insert_seeker(&self, seeker: JobSeeker) -> Result<JobSeeker, RepositoryError>;
    fn fetch_seeker(&self, id: &JobSeekerId) -> Result<Option<JobSeeker>, RepositoryError>;
    fn find_seeker_by_email(&self, email: &str) -> Result<Option<JobSeeker>, RepositoryError>;
    /// Set `job_selected` only when it is still empty. Returns whether this call set it.
    fn claim_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<bool, RepositoryError>;
    /// Undo [`JobSeekerRepository::claim_selection`] if the seeker still points at `job`.
    fn release_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<(), RepositoryError>;
}

pub trait OrganisationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the email is taken.
    fn insert_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, RepositoryError>;
    fn fetch_organisation(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, RepositoryError>;
    fn find_organisation_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Organisation>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the seeker already applied to the job.
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError>;
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn applications_for_seeker(
        &self,
        seeker: &JobSeekerId,
    ) -> Result<Vec<JobApplication>, RepositoryError>;
    /// Flip `selected` from false to true. Returns whether this call flipped it.
    fn mark_application_selected(&self, id: &ApplicationId) -> Result<bool, RepositoryError>;
}

/// Every collection the portal needs, behind one handle.
pub trait PortalStore:
    DomainRepository
    + JobRepository
    + JobSeekerRepository
    + OrganisationRepository
    + ApplicationRepository
{
}

impl<T> PortalStore for T where
    T: DomainRepository
        + JobRepository
        + JobSeekerRepository
        + OrganisationRepository
        + ApplicationRepository
{
}
