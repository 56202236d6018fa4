//! HTTP route table for the portal.
//!
//! Every handler resolves the caller's [`AuthContext`] from the session cookie, decodes and
//! validates its input, then calls exactly one directory or workflow operation. Successful
//! results are wrapped as `{"data": ...}`; failures render through [`PortalError`].

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::auth::{AuthContext, Role};
use super::domain::{
    ApplicationId, JobId, NewJob, OrganisationRegistration, SeekerRegistration,
};
use super::error::PortalError;
use super::query::{JobFilter, JobOrder, Pagination, SortDirection, SortField};
use super::repository::PortalStore;
use super::service::JobPortal;
use super::session::{CurrentSession, SessionToken};

pub fn portal_router<S>(portal: Arc<JobPortal<S>>) -> Router
where
    S: PortalStore + 'static,
{
    Router::new()
        .route("/jobSeeker/create", post(register_seeker::<S>))
        .route("/jobSeeker/auth", post(seeker_login::<S>))
        .route("/jobSeeker/me", get(seeker_profile::<S>))
        .route("/admin/auth", post(admin_login::<S>))
        .route("/org/create", post(register_organisation::<S>))
        .route("/org/auth", post(organisation_login::<S>))
        .route("/logout", post(logout::<S>))
        .route("/domain/create", post(create_domain::<S>))
        .route("/domain/all", get(domains_for_seekers::<S>))
        .route("/domain/certain", get(domain_for_seekers::<S>))
        .route("/org/domain/all", get(domains_for_organisation::<S>))
        .route("/org/domain/certain", get(domain_for_organisation::<S>))
        .route("/job/create", post(create_job::<S>))
        .route("/job/all", get(jobs_for_seekers::<S>))
        .route("/job/certain", get(filtered_jobs_for_seekers::<S>))
        .route("/org/job/all", get(jobs_for_organisation::<S>))
        .route("/org/job/certain", get(filtered_jobs_for_organisation::<S>))
        .route("/jobApplication/create", post(apply::<S>))
        .route("/jobApplication/select", post(select_applicant::<S>))
        .route(
            "/org/jobApplication/selected",
            get(selected_applicants::<S>),
        )
        .with_state(portal)
}

type Portal<S> = State<Arc<JobPortal<S>>>;

#[derive(Debug, Serialize)]
struct Envelope<T> {
    data: T,
}

fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { data })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, PortalError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| PortalError::validation(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, PortalError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| PortalError::validation(rejection.body_text()))
}

/// Run password hashing or verification on the blocking pool so Argon2 never holds up an
/// async worker.
async fn with_credentials<S, T, F>(portal: &Arc<JobPortal<S>>, work: F) -> Result<T, PortalError>
where
    S: PortalStore + 'static,
    T: Send + 'static,
    F: FnOnce(&JobPortal<S>) -> Result<T, PortalError> + Send + 'static,
{
    let portal = Arc::clone(portal);
    tokio::task::spawn_blocking(move || work(&portal))
        .await
        .map_err(|err| PortalError::Task(err.to_string()))?
}

#[derive(Debug, Deserialize)]
pub(crate) struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateDomainRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    page: Option<usize>,
    limit: Option<usize>,
    order: Option<String>,
    order_by: Option<String>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        page_of(self.page, self.limit)
    }

    fn field(&self) -> Result<SortField, PortalError> {
        self.order_by.as_deref().unwrap_or("date").parse()
    }

    fn seeker_order(&self) -> Result<JobOrder, PortalError> {
        Ok(JobOrder::new(
            self.field()?,
            SortDirection::seeker_facing(self.order.as_deref()),
        ))
    }

    fn organisation_order(&self) -> Result<JobOrder, PortalError> {
        Ok(JobOrder::new(
            self.field()?,
            SortDirection::organisation_facing(self.order.as_deref()),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FilterQuery {
    page: Option<usize>,
    limit: Option<usize>,
    filter: Option<u64>,
    filter_by: Option<String>,
}

impl FilterQuery {
    fn pagination(&self) -> Pagination {
        page_of(self.page, self.limit)
    }

    fn filter(&self) -> Result<JobFilter, PortalError> {
        JobFilter::parse(self.filter_by.as_deref().unwrap_or("recent"), self.filter)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomainQuery {
    page: Option<usize>,
    limit: Option<usize>,
    domain_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyRequest {
    job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SelectRequest {
    job_application_id: String,
}

fn page_of(page: Option<usize>, limit: Option<usize>) -> Pagination {
    let defaults = Pagination::default();
    Pagination::new(
        page.unwrap_or(defaults.page),
        limit.unwrap_or(defaults.limit),
    )
}

/// Replace any session the caller already holds and hand back the new cookie.
fn start_session<S>(
    portal: &JobPortal<S>,
    previous: Option<SessionToken>,
    role: Role,
    message: &'static str,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    if let Some(previous) = previous {
        portal.sessions.revoke(&previous)?;
    }
    let token = portal.sessions.issue(role)?;
    let cookie = portal.sessions.set_cookie(&token);
    Ok(([(header::SET_COOKIE, cookie)], ok(message)).into_response())
}

pub(crate) async fn register_seeker<S>(
    State(portal): Portal<S>,
    payload: Result<Json<SeekerRegistration>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let registration = body(payload)?;
    let seeker = with_credentials(&portal, move |portal| {
        portal.seekers.register(registration)
    })
    .await?;
    Ok(ok(seeker).into_response())
}

pub(crate) async fn seeker_login<S>(
    State(portal): Portal<S>,
    session: CurrentSession,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let Credentials { email, password } = body(payload)?;
    let seeker = with_credentials(&portal, move |portal| {
        portal.seekers.authenticate(&email, &password)
    })
    .await?;
    start_session(
        &portal,
        session.token,
        Role::JobSeeker(seeker.id),
        "Login Success!",
    )
}

pub(crate) async fn seeker_profile<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let seeker = auth.require_job_seeker()?;
    let profile = portal.seekers.my_applications(&seeker)?;
    Ok(ok(profile).into_response())
}

pub(crate) async fn admin_login<S>(
    State(portal): Portal<S>,
    session: CurrentSession,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let Credentials { email, password } = body(payload)?;
    let role = with_credentials(&portal, move |portal| {
        portal.admin.authenticate(&email, &password)
    })
    .await?;
    start_session(&portal, session.token, role, "Admin Login successful")
}

pub(crate) async fn register_organisation<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    payload: Result<Json<OrganisationRegistration>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    auth.require_admin()?;
    let registration = body(payload)?;
    let organisation = with_credentials(&portal, move |portal| {
        portal.organisations.register(registration)
    })
    .await?;
    Ok(ok(organisation).into_response())
}

pub(crate) async fn organisation_login<S>(
    State(portal): Portal<S>,
    session: CurrentSession,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let Credentials { email, password } = body(payload)?;
    let organisation = with_credentials(&portal, move |portal| {
        portal.organisations.authenticate(&email, &password)
    })
    .await?;
    start_session(
        &portal,
        session.token,
        Role::Organisation(organisation.id),
        "Organisation Login Success!",
    )
}

pub(crate) async fn logout<S>(
    State(portal): Portal<S>,
    session: CurrentSession,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    if let Some(token) = session.token {
        portal.sessions.revoke(&token)?;
    }
    let cookie = portal.sessions.expired_cookie();
    Ok(([(header::SET_COOKIE, cookie)], ok("Logged out")).into_response())
}

pub(crate) async fn create_domain<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    payload: Result<Json<CreateDomainRequest>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    auth.require_admin()?;
    let CreateDomainRequest { name } = body(payload)?;
    let domain = portal.domains.create(&name)?;
    Ok(ok(domain).into_response())
}

// `/domain/*` is gated on an organisation session as deployed, even though it serves the
// seeker-facing view.
pub(crate) async fn domains_for_seekers<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    auth.require_organisation()?;
    let params = query(params)?;
    let domains = portal
        .domains
        .list_for_seekers(params.pagination(), params.seeker_order()?)?;
    Ok(ok(domains).into_response())
}

pub(crate) async fn domain_for_seekers<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<DomainQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    auth.require_organisation()?;
    let params = query(params)?;
    let domains = portal
        .domains
        .list_one(page_of(params.page, params.limit), &params.domain_name)?;
    Ok(ok(domains).into_response())
}

pub(crate) async fn domains_for_organisation<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let params = query(params)?;
    let domains = portal.domains.list_for_organisation(
        params.pagination(),
        params.seeker_order()?,
        &organisation,
    )?;
    Ok(ok(domains).into_response())
}

pub(crate) async fn domain_for_organisation<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<DomainQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let params = query(params)?;
    let domains = portal.domains.list_one_for_organisation(
        page_of(params.page, params.limit),
        &params.domain_name,
        &organisation,
    )?;
    Ok(ok(domains).into_response())
}

pub(crate) async fn create_job<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let draft = body(payload)?;
    let job = portal.jobs.create(organisation, draft)?;
    Ok(ok(job).into_response())
}

pub(crate) async fn jobs_for_seekers<S>(
    State(portal): Portal<S>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let params = query(params)?;
    let jobs = portal
        .jobs
        .list_for_seekers(params.pagination(), params.seeker_order()?)?;
    Ok(ok(jobs).into_response())
}

pub(crate) async fn filtered_jobs_for_seekers<S>(
    State(portal): Portal<S>,
    params: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let params = query(params)?;
    let jobs =
        portal
            .jobs
            .list_filtered_for_seekers(params.pagination(), params.filter()?, Utc::now())?;
    Ok(ok(jobs).into_response())
}

pub(crate) async fn jobs_for_organisation<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let params = query(params)?;
    let jobs = portal.jobs.list_for_organisation(
        params.pagination(),
        params.organisation_order()?,
        &organisation,
    )?;
    Ok(ok(jobs).into_response())
}

pub(crate) async fn filtered_jobs_for_organisation<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    params: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let params = query(params)?;
    let jobs = portal.jobs.list_filtered_for_organisation(
        params.pagination(),
        params.filter()?,
        &organisation,
        Utc::now(),
    )?;
    Ok(ok(jobs).into_response())
}

pub(crate) async fn apply<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let seeker = auth.require_job_seeker()?;
    let ApplyRequest { job_id } = body(payload)?;
    let job_id: JobId = job_id
        .parse()
        .map_err(|_| PortalError::validation("jobId must be a valid identifier"))?;
    let application = portal.applications.apply(&job_id, &seeker)?;
    Ok(ok(application).into_response())
}

pub(crate) async fn select_applicant<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
    payload: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let SelectRequest { job_application_id } = body(payload)?;
    let application_id: ApplicationId = job_application_id
        .parse()
        .map_err(|_| PortalError::validation("jobApplicationId must be a valid identifier"))?;
    let receipt = portal.applications.select(&organisation, &application_id)?;
    Ok(ok(receipt).into_response())
}

pub(crate) async fn selected_applicants<S>(
    State(portal): Portal<S>,
    auth: AuthContext,
) -> Result<Response, PortalError>
where
    S: PortalStore + 'static,
{
    let organisation = auth.require_organisation()?;
    let jobs = portal.applications.selected_for_organisation(&organisation)?;
    Ok(ok(jobs).into_response())
}
