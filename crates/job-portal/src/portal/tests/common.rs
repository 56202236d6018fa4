use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::{AdminConfig, SessionConfig};
use crate::portal::credentials::{CredentialError, CredentialHasher};
use crate::portal::domain::{
    ApplicationId, Domain, Job, JobApplication, JobId, JobSeeker, JobSeekerId, NewJob,
    Organisation, OrganisationId, OrganisationRegistration, SeekerRegistration,
};
use crate::portal::memory::InMemoryPortalStore;
use crate::portal::repository::{
    ApplicationRepository, DomainRepository, JobRepository, JobSeekerRepository,
    OrganisationRepository, PortalStore, RepositoryError,
};
use crate::portal::service::JobPortal;

pub(super) const ADMIN_EMAIL: &str = "root@portal.test";
pub(super) const ADMIN_PASSWORD: &str = "admin-pass";
pub(super) const ORG_PASSWORD: &str = "org-pass";
pub(super) const SEEKER_PASSWORD: &str = "seeker-pass";

/// Reversible stand-in for Argon2 so fixtures stay fast.
pub(super) struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        hash.strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| CredentialError::MalformedHash(hash.to_string()))
    }
}

/// [`PlainHasher`] that also notes which thread each hash or verify ran on.
#[derive(Default)]
pub(super) struct ThreadRecordingHasher {
    pub(super) threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingHasher {
    fn record(&self) {
        self.threads
            .lock()
            .expect("hasher lock")
            .push(thread::current().id());
    }
}

impl CredentialHasher for ThreadRecordingHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        self.record();
        PlainHasher.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        self.record();
        PlainHasher.verify(password, hash)
    }
}

pub(super) fn admin_config() -> AdminConfig {
    AdminConfig {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }
}

pub(super) fn portal_with<S>(store: Arc<S>) -> JobPortal<S>
where
    S: PortalStore + 'static,
{
    JobPortal::from_config(
        store,
        Arc::new(PlainHasher),
        Some(&admin_config()),
        SessionConfig::default(),
    )
    .expect("portal builds")
}

pub(super) fn build_portal() -> (JobPortal<InMemoryPortalStore>, Arc<InMemoryPortalStore>) {
    let store = Arc::new(InMemoryPortalStore::default());
    (portal_with(store.clone()), store)
}

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    base_time() - Duration::days(days)
}

fn slug(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}

pub(super) fn register_organisation<S>(portal: &JobPortal<S>, name: &str) -> Organisation
where
    S: PortalStore + 'static,
{
    portal
        .organisations
        .register(OrganisationRegistration {
            name: name.to_string(),
            email: format!("{}@org.test", slug(name)),
            password: ORG_PASSWORD.to_string(),
        })
        .expect("organisation registers")
}

pub(super) fn seeker_registration(name: &str) -> SeekerRegistration {
    SeekerRegistration {
        name: name.to_string(),
        email: format!("{}@seeker.test", slug(name)),
        password: SEEKER_PASSWORD.to_string(),
        skill: "rust".to_string(),
    }
}

pub(super) fn register_seeker<S>(portal: &JobPortal<S>, name: &str) -> JobSeeker
where
    S: PortalStore + 'static,
{
    portal
        .seekers
        .register(seeker_registration(name))
        .expect("seeker registers")
}

pub(super) fn create_domain<S>(portal: &JobPortal<S>, name: &str) -> Domain
where
    S: PortalStore + 'static,
{
    portal.domains.create(name).expect("domain creates")
}

pub(super) fn new_job(name: &str, domain: &str, ctc: u64, vacancy: u32) -> NewJob {
    NewJob {
        name: name.to_string(),
        org_name: "Acme".to_string(),
        domain_name: domain.to_string(),
        skill_req: "rust".to_string(),
        ctc,
        vacancy,
    }
}

pub(super) fn post_job<S>(
    portal: &JobPortal<S>,
    owner: &Organisation,
    draft: NewJob,
    at: DateTime<Utc>,
) -> Job
where
    S: PortalStore + 'static,
{
    portal
        .jobs
        .create_at(owner.id, draft, at)
        .expect("job posts")
}

pub(super) fn names(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|job| job.name.as_str()).collect()
}

/// Delegates to the in-memory store but fails the last selection step, and optionally the
/// vacancy compensation as well.
#[derive(Default)]
pub(super) struct FailingMarkStore {
    pub(super) inner: InMemoryPortalStore,
    pub(super) fail_restore: bool,
}

impl DomainRepository for FailingMarkStore {
    fn insert_domain(&self, domain: Domain) -> Result<Domain, RepositoryError> {
        self.inner.insert_domain(domain)
    }

    fn find_domain(&self, name: &str) -> Result<Option<Domain>, RepositoryError> {
        self.inner.find_domain(name)
    }

    fn domains(&self) -> Result<Vec<Domain>, RepositoryError> {
        self.inner.domains()
    }
}

impl JobRepository for FailingMarkStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        self.inner.fetch_job(id)
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.inner.jobs()
    }

    fn take_vacancy(&self, id: &JobId) -> Result<Option<u32>, RepositoryError> {
        self.inner.take_vacancy(id)
    }

    fn restore_vacancy(&self, id: &JobId) -> Result<(), RepositoryError> {
        if self.fail_restore {
            return Err(RepositoryError::Unavailable("restore rejected".to_string()));
        }
        self.inner.restore_vacancy(id)
    }
}

impl JobSeekerRepository for FailingMarkStore {
    fn insert_seeker(&self, seeker: JobSeeker) -> Result<JobSeeker, RepositoryError> {
        self.inner.insert_seeker(seeker)
    }

    fn fetch_seeker(&self, id: &JobSeekerId) -> Result<Option<JobSeeker>, RepositoryError> {
        self.inner.fetch_seeker(id)
    }

    fn find_seeker_by_email(&self, email: &str) -> Result<Option<JobSeeker>, RepositoryError> {
        self.inner.find_seeker_by_email(email)
    }

    fn claim_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<bool, RepositoryError> {
        self.inner.claim_selection(id, job)
    }

    fn release_selection(&self, id: &JobSeekerId, job: &JobId) -> Result<(), RepositoryError> {
        self.inner.release_selection(id, job)
    }
}

impl OrganisationRepository for FailingMarkStore {
    fn insert_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, RepositoryError> {
        self.inner.insert_organisation(organisation)
    }

    fn fetch_organisation(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, RepositoryError> {
        self.inner.fetch_organisation(id)
    }

    fn find_organisation_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Organisation>, RepositoryError> {
        self.inner.find_organisation_by_email(email)
    }
}

impl ApplicationRepository for FailingMarkStore {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        self.inner.insert_application(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        self.inner.fetch_application(id)
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.applications_for_job(job)
    }

    fn applications_for_seeker(
        &self,
        seeker: &JobSeekerId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.applications_for_seeker(seeker)
    }

    fn mark_application_selected(&self, _id: &ApplicationId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("write rejected".to_string()))
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("json body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request builds")
}

/// `name=value` pair of the response's `Set-Cookie` header.
pub(super) fn session_cookie(response: &Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().expect("cookie pair").to_string()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
