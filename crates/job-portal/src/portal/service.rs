use std::sync::Arc;

use super::applications::ApplicationWorkflow;
use super::auth::AdminDirectory;
use super::credentials::{CredentialError, CredentialHasher};
use super::domains::DomainDirectory;
use super::jobs::JobCatalog;
use super::organisations::OrganisationDirectory;
use super::repository::PortalStore;
use super::seekers::JobSeekerDirectory;
use super::session::SessionStore;
use crate::config::{AdminConfig, SessionConfig};

/// Every directory and workflow wired against one store, plus the session table.
pub struct JobPortal<S> {
    pub domains: DomainDirectory<S>,
    pub jobs: JobCatalog<S>,
    pub seekers: JobSeekerDirectory<S>,
    pub organisations: OrganisationDirectory<S>,
    pub applications: ApplicationWorkflow<S>,
    pub admin: AdminDirectory,
    pub sessions: SessionStore,
}

impl<S> JobPortal<S>
where
    S: PortalStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        hasher: Arc<dyn CredentialHasher>,
        admin: AdminDirectory,
        sessions: SessionStore,
    ) -> Self {
        Self {
            domains: DomainDirectory::new(store.clone()),
            jobs: JobCatalog::new(store.clone()),
            seekers: JobSeekerDirectory::new(store.clone(), hasher.clone()),
            organisations: OrganisationDirectory::new(store.clone(), hasher),
            applications: ApplicationWorkflow::new(store),
            admin,
            sessions,
        }
    }

    /// Build from configuration pieces, hashing the admin password up front.
    pub fn from_config(
        store: Arc<S>,
        hasher: Arc<dyn CredentialHasher>,
        admin: Option<&AdminConfig>,
        session: SessionConfig,
    ) -> Result<Self, CredentialError> {
        let admin = AdminDirectory::from_config(admin, hasher.clone())?;
        Ok(Self::new(store, hasher, admin, SessionStore::new(session)))
    }
}
