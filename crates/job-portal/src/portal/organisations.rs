use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::CredentialHasher;
use super::domain::{Organisation, OrganisationId, OrganisationRegistration};
use super::error::PortalError;
use super::repository::{PortalStore, RepositoryError};
use super::validation;

pub struct OrganisationDirectory<S> {
    store: Arc<S>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<S> OrganisationDirectory<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn register(
        &self,
        registration: OrganisationRegistration,
    ) -> Result<Organisation, PortalError> {
        let name = validation::required("name", &registration.name)?;
        let email = validation::email("email", &registration.email)?;
        let password = validation::password(&registration.password)?;

        let organisation = Organisation {
            id: OrganisationId::generate(),
            name,
            email,
            password_hash: self.hasher.hash(password)?,
        };

        let stored = self
            .store
            .insert_organisation(organisation)
            .map_err(|err| match err {
                RepositoryError::Conflict => PortalError::conflict("email already registered"),
                other => other.into(),
            })?;
        info!(organisation = %stored.id, name = %stored.name, "organisation registered");
        Ok(stored)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Organisation, PortalError> {
        let email = validation::email("email", email)?;
        let password = validation::password(password)?;

        let Some(organisation) = self.store.find_organisation_by_email(&email)? else {
            warn!("organisation login for unknown email");
            return Err(PortalError::not_found("organisation doesn't exists"));
        };

        if !self.hasher.verify(password, &organisation.password_hash)? {
            warn!(organisation = %organisation.id, "organisation login with wrong password");
            return Err(PortalError::unauthorized("password doesn't match"));
        }

        info!(organisation = %organisation.id, "organisation logged in");
        Ok(organisation)
    }
}
