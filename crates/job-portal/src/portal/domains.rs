use std::sync::Arc;

use tracing::info;

use super::domain::{Domain, DomainId, Job, OrganisationId};
use super::error::PortalError;
use super::lookup::with_pending_applicants;
use super::query::{JobOrder, Pagination};
use super::repository::{PortalStore, RepositoryError};
use super::validation;
use super::views::{DomainListing, JobWithApplicants};

/// Creates job domains and lists them together with their jobs.
///
/// Domains are paginated in their natural order; ordering applies to the jobs nested
/// inside each domain.
pub struct DomainDirectory<S> {
    store: Arc<S>,
}

impl<S> DomainDirectory<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str) -> Result<Domain, PortalError> {
        let name = validation::required("name", name)?;
        let domain = Domain {
            id: DomainId::generate(),
            name,
        };

        let stored = self.store.insert_domain(domain).map_err(|err| match err {
            RepositoryError::Conflict => PortalError::conflict("Domain already exists"),
            other => other.into(),
        })?;
        info!(domain = %stored.name, "domain created");
        Ok(stored)
    }

    /// Every domain with its open jobs, jobs ordered as requested.
    pub fn list_for_seekers(
        &self,
        pagination: Pagination,
        order: JobOrder,
    ) -> Result<Vec<DomainListing<Job>>, PortalError> {
        let domains = pagination.apply(self.store.domains()?);
        let jobs = self.store.jobs()?;
        Ok(domains
            .into_iter()
            .map(|domain| {
                let mut open = open_jobs_in(&jobs, &domain.name);
                order.sort(&mut open);
                DomainListing { domain, jobs: open }
            })
            .collect())
    }

    /// One domain by name with its open jobs in natural order.
    pub fn list_one(
        &self,
        pagination: Pagination,
        domain_name: &str,
    ) -> Result<Vec<DomainListing<Job>>, PortalError> {
        let domain_name = validation::required("domainName", domain_name)?;
        let domains = pagination.apply(self.named(&domain_name)?);
        let jobs = self.store.jobs()?;
        Ok(domains
            .into_iter()
            .map(|domain| {
                let open = open_jobs_in(&jobs, &domain.name);
                DomainListing { domain, jobs: open }
            })
            .collect())
    }

    /// Every domain with the organisation's own jobs and their pending applicants.
    pub fn list_for_organisation(
        &self,
        pagination: Pagination,
        order: JobOrder,
        organisation: &OrganisationId,
    ) -> Result<Vec<DomainListing<JobWithApplicants>>, PortalError> {
        let domains = pagination.apply(self.store.domains()?);
        let jobs = self.store.jobs()?;
        domains
            .into_iter()
            .map(|domain| {
                let mut owned = owned_jobs_in(&jobs, &domain.name, organisation);
                order.sort(&mut owned);
                let jobs = with_pending_applicants(self.store.as_ref(), owned)?;
                Ok(DomainListing { domain, jobs })
            })
            .collect()
    }

    pub fn list_one_for_organisation(
        &self,
        pagination: Pagination,
        domain_name: &str,
        organisation: &OrganisationId,
    ) -> Result<Vec<DomainListing<JobWithApplicants>>, PortalError> {
        let domain_name = validation::required("domainName", domain_name)?;
        let domains = pagination.apply(self.named(&domain_name)?);
        let jobs = self.store.jobs()?;
        domains
            .into_iter()
            .map(|domain| {
                let owned = owned_jobs_in(&jobs, &domain.name, organisation);
                let jobs = with_pending_applicants(self.store.as_ref(), owned)?;
                Ok(DomainListing { domain, jobs })
            })
            .collect()
    }

    fn named(&self, domain_name: &str) -> Result<Vec<Domain>, PortalError> {
        Ok(self.store.find_domain(domain_name)?.into_iter().collect())
    }
}

fn open_jobs_in(jobs: &[Job], domain_name: &str) -> Vec<Job> {
    jobs.iter()
        .filter(|job| job.domain_name == domain_name && job.is_open())
        .cloned()
        .collect()
}

fn owned_jobs_in(jobs: &[Job], domain_name: &str, organisation: &OrganisationId) -> Vec<Job> {
    jobs.iter()
        .filter(|job| job.domain_name == domain_name && &job.organisation_id == organisation)
        .cloned()
        .collect()
}
