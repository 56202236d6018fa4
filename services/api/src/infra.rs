use job_portal::config::{AdminConfig, SessionConfig};
use job_portal::portal::{Argon2Hasher, CredentialError, InMemoryPortalStore, JobPortal};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Portal = JobPortal<InMemoryPortalStore>;

/// Portal over a fresh in-memory store, hashing with Argon2.
pub(crate) fn in_memory_portal(
    admin: Option<&AdminConfig>,
    session: SessionConfig,
) -> Result<Arc<Portal>, CredentialError> {
    let portal = JobPortal::from_config(
        Arc::new(InMemoryPortalStore::default()),
        Arc::new(Argon2Hasher::default()),
        admin,
        session,
    )?;
    Ok(Arc::new(portal))
}
