//! Applying to jobs and selecting applicants.
//!
//! Selection touches three documents: the seeker (`job_selected`), the job (`vacancy`)
//! and the application (`selected`). Each step is a conditional write on the store, and a
//! failed later step undoes the earlier ones, so a selection lands completely or not at all.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::domain::{ApplicationId, JobApplication, JobId, JobSeekerId, OrganisationId};
use super::error::PortalError;
use super::lookup::job_with_applicants;
use super::repository::{PortalStore, RepositoryError};
use super::views::{JobWithApplicants, SelectionReceipt};

pub const NO_VACANCIES: &str = "No vacancies left";
pub const ALREADY_SELECTED: &str = "Already Selected";
pub const ALREADY_APPLIED: &str = "Already Applied";
pub const APPLICANT_ALREADY_SELECTED: &str = "Applicant has already been selected";
pub const APPLICATION_ALREADY_SELECTED: &str = "Application has already been selected";
pub const SELECTED: &str = "The applicant is selected!";

pub struct ApplicationWorkflow<S> {
    store: Arc<S>,
}

impl<S> ApplicationWorkflow<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record a pending application.
    ///
    /// Vacancy is only consumed at selection, so two seekers may both apply to the last
    /// seat; `select` is where scarcity is enforced.
    pub fn apply(
        &self,
        job_id: &JobId,
        seeker_id: &JobSeekerId,
    ) -> Result<JobApplication, PortalError> {
        let seeker = self
            .store
            .fetch_seeker(seeker_id)?
            .ok_or_else(|| PortalError::not_found("user doesn't exists"))?;
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| PortalError::not_found("Job doesn't exist"))?;

        if seeker.is_selected() {
            warn!(job = %job.id, seeker = %seeker.id, "application from a selected seeker");
            return Err(PortalError::conflict(ALREADY_SELECTED));
        }
        if !job.is_open() {
            warn!(job = %job.id, seeker = %seeker.id, "application to a filled job");
            return Err(PortalError::conflict(NO_VACANCIES));
        }

        let application = match self
            .store
            .insert_application(JobApplication::pending(job.id, seeker.id))
        {
            Ok(application) => application,
            Err(RepositoryError::Conflict) => {
                return Err(PortalError::conflict(ALREADY_APPLIED));
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            application = %application.id,
            job = %job.id,
            seeker = %seeker.id,
            "application submitted"
        );
        Ok(application)
    }

    /// Select a pending application on one of the organisation's jobs.
    pub fn select(
        &self,
        organisation: &OrganisationId,
        application_id: &ApplicationId,
    ) -> Result<SelectionReceipt, PortalError> {
        let application = self
            .store
            .fetch_application(application_id)?
            .ok_or_else(|| PortalError::not_found("Job application doesn't exist"))?;
        let job = self
            .store
            .fetch_job(&application.job_id)?
            .ok_or_else(|| PortalError::not_found("Job doesn't exist"))?;
        if &job.organisation_id != organisation {
            warn!(
                application = %application.id,
                organisation = %organisation,
                "selection on a foreign job"
            );
            return Err(PortalError::unauthorized("Job belongs to another organisation"));
        }
        if application.selected {
            return Err(PortalError::conflict(APPLICATION_ALREADY_SELECTED));
        }

        let seeker_id = application.job_seeker_id;
        match self.store.claim_selection(&seeker_id, &job.id) {
            Ok(true) => {}
            Ok(false) => {
                warn!(seeker = %seeker_id, "applicant already selected");
                return Err(PortalError::conflict(APPLICANT_ALREADY_SELECTED));
            }
            Err(RepositoryError::NotFound) => {
                return Err(PortalError::not_found("user doesn't exists"));
            }
            Err(err) => return Err(err.into()),
        }

        let remaining_vacancy = match self.store.take_vacancy(&job.id) {
            Ok(Some(remaining)) => remaining,
            Ok(None) => {
                self.undo(&seeker_id, &job.id, false);
                warn!(job = %job.id, "selection on a filled job");
                return Err(PortalError::conflict(NO_VACANCIES));
            }
            Err(err) => {
                self.undo(&seeker_id, &job.id, false);
                return Err(err.into());
            }
        };

        match self.store.mark_application_selected(&application.id) {
            Ok(true) => {}
            Ok(false) => {
                self.undo(&seeker_id, &job.id, true);
                return Err(PortalError::conflict(APPLICATION_ALREADY_SELECTED));
            }
            Err(err) => {
                self.undo(&seeker_id, &job.id, true);
                return Err(err.into());
            }
        }

        info!(
            application = %application.id,
            job = %job.id,
            seeker = %seeker_id,
            remaining_vacancy,
            "applicant selected"
        );
        Ok(SelectionReceipt {
            message: SELECTED,
            application: JobApplication {
                selected: true,
                ..application
            },
            remaining_vacancy,
        })
    }

    /// The organisation's jobs, each with the applicants selected into it.
    pub fn selected_for_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<JobWithApplicants>, PortalError> {
        self.store
            .jobs()?
            .into_iter()
            .filter(|job| &job.organisation_id == organisation)
            .map(|job| job_with_applicants(self.store.as_ref(), job, true))
            .collect()
    }

    /// Best-effort compensation. The caller returns the error that triggered it; a failed
    /// compensation is only logged.
    fn undo(&self, seeker_id: &JobSeekerId, job_id: &JobId, vacancy_taken: bool) {
        if vacancy_taken {
            if let Err(err) = self.store.restore_vacancy(job_id) {
                error!(job = %job_id, error = %err, "failed to restore vacancy");
            }
        }
        if let Err(err) = self.store.release_selection(seeker_id, job_id) {
            error!(seeker = %seeker_id, error = %err, "failed to release seeker");
        }
    }
}
