use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::CredentialHasher;
use super::domain::{JobSeeker, JobSeekerId, SeekerRegistration};
use super::error::PortalError;
use super::lookup::applications_with_jobs;
use super::repository::{PortalStore, RepositoryError};
use super::validation;
use super::views::SeekerProfile;

const UNKNOWN_USER: &str = "user doesn't exists";

pub struct JobSeekerDirectory<S> {
    store: Arc<S>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<S> JobSeekerDirectory<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn register(&self, registration: SeekerRegistration) -> Result<JobSeeker, PortalError> {
        let name = validation::required("name", &registration.name)?;
        let email = validation::email("email", &registration.email)?;
        let password = validation::password(&registration.password)?;
        let skill = validation::required("skill", &registration.skill)?;

        let seeker = JobSeeker {
            id: JobSeekerId::generate(),
            name,
            email,
            password_hash: self.hasher.hash(password)?,
            skill,
            job_selected: None,
        };

        let stored = self.store.insert_seeker(seeker).map_err(|err| match err {
            RepositoryError::Conflict => PortalError::conflict("email already registered"),
            other => other.into(),
        })?;
        info!(seeker = %stored.id, "job seeker registered");
        Ok(stored)
    }

    /// Returns the stored record on success; callers keep only its id in the session.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<JobSeeker, PortalError> {
        let email = validation::email("email", email)?;
        let password = validation::password(password)?;

        let Some(seeker) = self.store.find_seeker_by_email(&email)? else {
            warn!("job seeker login for unknown email");
            return Err(PortalError::not_found(UNKNOWN_USER));
        };

        if !self.hasher.verify(password, &seeker.password_hash)? {
            warn!(seeker = %seeker.id, "job seeker login with wrong password");
            return Err(PortalError::unauthorized("password doesn't match"));
        }

        info!(seeker = %seeker.id, "job seeker logged in");
        Ok(seeker)
    }

    /// Applications with job details while unselected; the selected job once chosen.
    pub fn my_applications(&self, seeker_id: &JobSeekerId) -> Result<SeekerProfile, PortalError> {
        let seeker = self
            .store
            .fetch_seeker(seeker_id)?
            .ok_or_else(|| PortalError::not_found(UNKNOWN_USER))?;

        match seeker.job_selected {
            None => {
                let applications = applications_with_jobs(self.store.as_ref(), &seeker.id)?;
                Ok(SeekerProfile::Applying {
                    seeker,
                    applications,
                })
            }
            Some(job_id) => {
                let selected_in = self.store.fetch_job(&job_id)?;
                Ok(SeekerProfile::Selected {
                    seeker,
                    selected_in,
                })
            }
        }
    }
}
