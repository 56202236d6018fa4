//! Server-side joins between collections.

use super::domain::{Job, JobSeekerId};
use super::error::PortalError;
use super::repository::PortalStore;
use super::views::{ApplicantEntry, ApplicationWithJob, JobWithApplicants};

/// Join a job with its applications in the given state, each with its applicant.
pub(crate) fn job_with_applicants<S>(
    store: &S,
    job: Job,
    selected: bool,
) -> Result<JobWithApplicants, PortalError>
where
    S: PortalStore + ?Sized,
{
    let applications = store
        .applications_for_job(&job.id)?
        .into_iter()
        .filter(|application| application.selected == selected)
        .map(|application| {
            let applicant = store.fetch_seeker(&application.job_seeker_id)?;
            Ok(ApplicantEntry {
                application,
                applicant,
            })
        })
        .collect::<Result<Vec<_>, PortalError>>()?;

    Ok(JobWithApplicants { job, applications })
}

/// Pending applications are the ones an organisation can still select from.
pub(crate) fn with_pending_applicants<S>(
    store: &S,
    jobs: Vec<Job>,
) -> Result<Vec<JobWithApplicants>, PortalError>
where
    S: PortalStore + ?Sized,
{
    jobs.into_iter()
        .map(|job| job_with_applicants(store, job, false))
        .collect()
}

/// Every application a seeker has made, each joined with the job it targets.
pub(crate) fn applications_with_jobs<S>(
    store: &S,
    seeker: &JobSeekerId,
) -> Result<Vec<ApplicationWithJob>, PortalError>
where
    S: PortalStore + ?Sized,
{
    store
        .applications_for_seeker(seeker)?
        .into_iter()
        .map(|application| {
            let job_details = store.fetch_job(&application.job_id)?;
            Ok(ApplicationWithJob {
                application,
                job_details,
            })
        })
        .collect()
}
