use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    ApplicationId, Domain, Job, JobApplication, JobId, JobSeeker, JobSeekerId, Organisation,
    OrganisationId,
};
use super::repository::{
    ApplicationRepository, DomainRepository, JobRepository, JobSeekerRepository,
    OrganisationRepository, RepositoryError,
};

/// Process-local document store. Each collection keeps insertion order.
#[derive(Default, Clone)]
pub struct InMemoryPortalStore {
    domains: Arc<Mutex<Vec<Domain>>>,
    jobs: Arc<Mutex<Vec<Job>>>,
    seekers: Arc<Mutex<Vec<JobSeeker>>>,
    organisations: Arc<Mutex<Vec<Organisation>>>,
    applications: Arc<Mutex<Vec<JobApplication>>>,
}

fn lock<'a, T>(
    collection: &'a Mutex<Vec<T>>,
    name: &str,
) -> Result<MutexGuard<'a, Vec<T>>, RepositoryError> {
    collection
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} collection poisoned")))
}

impl DomainRepository for InMemoryPortalStore {
    fn insert_domain(&self, domain: Domain) -> Result<Domain, RepositoryError> {
        let mut guard = lock(&self.domains, "domains")?;
        if guard.iter().any(|existing| existing.name == domain.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(domain.clone());
        Ok(domain)
    }

    fn find_domain(&self, name: &str) -> Result<Option<Domain>, RepositoryError> {
        let guard = lock(&self.domains, "domains")?;
        Ok(guard.iter().find(|domain| domain.name == name).cloned())
    }

    fn domains(&self) -> Result<Vec<Domain>, RepositoryError> {
        Ok(lock(&self.domains, "domains")?.clone())
    }
}

impl JobRepository for InMemoryPortalStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = lock(&self.jobs, "jobs")?;
        if guard.iter().any(|existing| existing.id == job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = lock(&self.jobs, "jobs")?;
        Ok(guard.iter().find(|job| &job.id == id).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(lock(&self.jobs, "jobs")?.clone())
    }

    fn take_vacancy(&self, id: &JobId) -> Result<Option<u32>, RepositoryError> {
        let mut guard = lock(&self.jobs, "jobs")?;
        let job = guard
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if job.vacancy == 0 {
            return Ok(None);
        }
        job.vacancy -= 1;
        Ok(Some(job.vacancy))
    }

    fn restore_vacancy(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.jobs, "jobs")?;
        let job = guard
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or(RepositoryError::NotFound)?;
        job.vacancy = job.vacancy.saturating_add(1);
        Ok(())
    }
}

impl JobSeekerRepository for InMemoryPortalStore {
    fn insert_seeker(&self, seeker: JobSeeker) -> Result<JobSeeker, RepositoryError> {
        let mut guard = lock(&self.seekers, "job seekers")?;
        if guard
            .iter()
            .any(|existing| existing.id == seeker.id || existing.email == seeker.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(seeker.clone());
        Ok(seeker)
    }

    fn fetch_seeker(&self, id: &JobSeekerId) -> Result<Option<JobSeeker>, RepositoryError> {
        let guard = lock(&self.seekers, "job seekers")?;
        Ok(guard.iter().find(|seeker| &seeker.id == id).cloned())
    }

    fn find_seeker_by_email(&self, email: &str) -> Result<Option<JobSeeker>, RepositoryError> {
        let guard = lock(&self.seekers, "job seekers")?;
        Ok(guard.iter().find(|seeker| seeker.email == email).cloned())
    }

    fn claim_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<bool, RepositoryError> {
        let mut guard = lock(&self.seekers, "job seekers")?;
        let seeker = guard
            .iter_mut()
            .find(|seeker| &seeker.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if seeker.job_selected.is_some() {
            return Ok(false);
        }
        seeker.job_selected = Some(*job);
        Ok(true)
    }

    fn release_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.seekers, "job seekers")?;
        let seeker = guard
            .iter_mut()
            .find(|seeker| &seeker.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if seeker.job_selected.as_ref() == Some(job) {
            seeker.job_selected = None;
        }
        Ok(())
    }
}

impl OrganisationRepository for InMemoryPortalStore {
    fn insert_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, RepositoryError> {
        let mut guard = lock(&self.organisations, "organisations")?;
        if guard.iter().any(|existing| {
            existing.id == organisation.id || existing.email == organisation.email
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(organisation.clone());
        Ok(organisation)
    }

    fn fetch_organisation(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, RepositoryError> {
        let guard = lock(&self.organisations, "organisations")?;
        Ok(guard.iter().find(|organisation| &organisation.id == id).cloned())
    }

    fn find_organisation_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Organisation>, RepositoryError> {
        let guard = lock(&self.organisations, "organisations")?;
        Ok(guard
            .iter()
            .find(|organisation| organisation.email == email)
            .cloned())
    }
}

impl ApplicationRepository for InMemoryPortalStore {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut guard = lock(&self.applications, "job applications")?;
        let taken = guard.iter().any(|existing| {
            existing.id == application.id
                || (existing.job_id == application.job_id
                    && existing.job_seeker_id == application.job_seeker_id)
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.push(application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = lock(&self.applications, "job applications")?;
        Ok(guard.iter().find(|application| &application.id == id).cloned())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = lock(&self.applications, "job applications")?;
        Ok(guard
            .iter()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect())
    }

    fn applications_for_seeker(
        &self,
        seeker: &JobSeekerId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = lock(&self.applications, "job applications")?;
        Ok(guard
            .iter()
            .filter(|application| &application.job_seeker_id == seeker)
            .cloned()
            .collect())
    }

    fn mark_application_selected(&self, id: &ApplicationId) -> Result<bool, RepositoryError> {
        let mut guard = lock(&self.applications, "job applications")?;
        let application = guard
            .iter_mut()
            .find(|application| &application.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if application.selected {
            return Ok(false);
        }
        application.selected = true;
        Ok(true)
    }
}
