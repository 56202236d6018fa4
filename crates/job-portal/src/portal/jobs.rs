use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{Job, JobId, NewJob, OrganisationId};
use super::error::PortalError;
use super::lookup::with_pending_applicants;
use super::query::{JobFilter, JobOrder, Pagination};
use super::repository::PortalStore;
use super::validation;
use super::views::JobWithApplicants;

/// Job postings and their seeker- and organisation-facing listings.
///
/// Candidates are filtered and ordered first, then paginated, so a page is always a
/// window onto the fully ordered candidate set.
pub struct JobCatalog<S> {
    store: Arc<S>,
}

impl<S> JobCatalog<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: OrganisationId, draft: NewJob) -> Result<Job, PortalError> {
        self.create_at(owner, draft, Utc::now())
    }

    /// Post a job under an existing domain, stamped with `now` as its creation time.
    /// `org_name` is the display name the organisation chose for this posting.
    pub fn create_at(
        &self,
        owner: OrganisationId,
        draft: NewJob,
        now: DateTime<Utc>,
    ) -> Result<Job, PortalError> {
        let NewJob {
            name,
            org_name,
            domain_name,
            skill_req,
            ctc,
            vacancy,
        } = draft;
        let name = validation::required("name", &name)?;
        let organisation_name = validation::required("orgName", &org_name)?;
        let domain_name = validation::required("domainName", &domain_name)?;
        let skill_req = validation::required("skillReq", &skill_req)?;

        if self.store.fetch_organisation(&owner)?.is_none() {
            return Err(PortalError::not_found("organisation doesn't exists"));
        }
        if self.store.find_domain(&domain_name)?.is_none() {
            return Err(PortalError::not_found("Domain doesn't exist"));
        }

        let job = self.store.insert_job(Job {
            id: JobId::generate(),
            name,
            organisation_id: owner,
            organisation_name,
            domain_name,
            skill_req,
            date_added: now,
            ctc,
            vacancy,
        })?;
        info!(
            job = %job.id,
            organisation = %owner,
            domain = %job.domain_name,
            vacancy = job.vacancy,
            "job posted"
        );
        Ok(job)
    }

    /// Open jobs (`vacancy > 0`), ordered then paginated.
    pub fn list_for_seekers(
        &self,
        pagination: Pagination,
        order: JobOrder,
    ) -> Result<Vec<Job>, PortalError> {
        let mut open: Vec<Job> = self
            .store
            .jobs()?
            .into_iter()
            .filter(Job::is_open)
            .collect();
        order.sort(&mut open);
        Ok(pagination.apply(open))
    }

    /// Jobs matching `filter` as seen by seekers, in natural order.
    pub fn list_filtered_for_seekers(
        &self,
        pagination: Pagination,
        filter: JobFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Job>, PortalError> {
        let matching = self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| filter.matches_for_seekers(job, now));
        Ok(pagination.apply(matching))
    }

    /// The organisation's jobs with their pending applicants.
    pub fn list_for_organisation(
        &self,
        pagination: Pagination,
        order: JobOrder,
        organisation: &OrganisationId,
    ) -> Result<Vec<JobWithApplicants>, PortalError> {
        let mut owned = self.owned_by(organisation)?;
        order.sort(&mut owned);
        with_pending_applicants(self.store.as_ref(), pagination.apply(owned))
    }

    pub fn list_filtered_for_organisation(
        &self,
        pagination: Pagination,
        filter: JobFilter,
        organisation: &OrganisationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<JobWithApplicants>, PortalError> {
        let matching = self
            .owned_by(organisation)?
            .into_iter()
            .filter(|job| filter.matches_for_organisation(job, now));
        with_pending_applicants(self.store.as_ref(), pagination.apply(matching))
    }

    fn owned_by(&self, organisation: &OrganisationId) -> Result<Vec<Job>, PortalError> {
        Ok(self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| &job.organisation_id == organisation)
            .collect())
    }
}
