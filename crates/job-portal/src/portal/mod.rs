//! Job portal domain: directories, the application workflow and their HTTP surface.

pub mod applications;
pub mod auth;
pub mod credentials;
pub mod domain;
pub mod domains;
pub mod error;
pub mod jobs;
mod lookup;
pub mod memory;
pub mod organisations;
pub mod query;
pub mod repository;
pub mod router;
pub mod seekers;
pub mod service;
pub mod session;
mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use applications::ApplicationWorkflow;
pub use auth::{AdminDirectory, AuthContext, Role};
pub use credentials::{Argon2Hasher, CredentialError, CredentialHasher};
pub use domain::{
    ApplicationId, Domain, DomainId, Job, JobApplication, JobId, JobSeeker, JobSeekerId, NewJob,
    Organisation, OrganisationId, OrganisationRegistration, SeekerRegistration,
};
pub use domains::DomainDirectory;
pub use error::PortalError;
pub use jobs::JobCatalog;
pub use memory::InMemoryPortalStore;
pub use organisations::OrganisationDirectory;
pub use query::{JobFilter, JobOrder, Pagination, SortDirection, SortField};
pub use repository::{
    ApplicationRepository, DomainRepository, JobRepository, JobSeekerRepository,
    OrganisationRepository, PortalStore, RepositoryError,
};
pub use router::portal_router;
pub use seekers::JobSeekerDirectory;
pub use service::JobPortal;
pub use session::{CurrentSession, SessionStore, SessionToken};
pub use views::{
    ApplicantEntry, ApplicationWithJob, DomainListing, JobWithApplicants, SeekerProfile,
    SelectionReceipt,
};
