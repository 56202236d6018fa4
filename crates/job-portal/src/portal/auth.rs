use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::{CredentialError, CredentialHasher};
use super::domain::{JobSeekerId, OrganisationId};
use super::error::PortalError;
use crate::config::AdminConfig;

const NOT_AUTHENTICATED: &str = "Not Authenticated";

/// Who is making a request, resolved once from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Admin,
    Organisation(OrganisationId),
    JobSeeker(JobSeekerId),
}

/// Authorization context handed explicitly to every gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    role: Role,
}

impl AuthContext {
    pub const fn new(role: Role) -> Self {
        Self { role }
    }

    pub const fn anonymous() -> Self {
        Self::new(Role::Anonymous)
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn require_admin(&self) -> Result<(), PortalError> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(PortalError::unauthorized(NOT_AUTHENTICATED)),
        }
    }

    pub fn require_organisation(&self) -> Result<OrganisationId, PortalError> {
        match self.role {
            Role::Organisation(id) => Ok(id),
            _ => Err(PortalError::unauthorized(NOT_AUTHENTICATED)),
        }
    }

    pub fn require_job_seeker(&self) -> Result<JobSeekerId, PortalError> {
        match self.role {
            Role::JobSeeker(id) => Ok(id),
            _ => Err(PortalError::unauthorized(NOT_AUTHENTICATED)),
        }
    }
}

struct AdminAccount {
    email: String,
    password_hash: String,
}

/// The single configured administrator. Without configuration nobody can log in as admin.
pub struct AdminDirectory {
    account: Option<AdminAccount>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AdminDirectory {
    pub fn from_config(
        config: Option<&AdminConfig>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Result<Self, CredentialError> {
        let account = match config {
            Some(admin) => Some(AdminAccount {
                email: admin.email.clone(),
                password_hash: hasher.hash(&admin.password)?,
            }),
            None => None,
        };
        Ok(Self { account, hasher })
    }

    pub fn is_configured(&self) -> bool {
        self.account.is_some()
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Role, PortalError> {
        let account = self
            .account
            .as_ref()
            .filter(|account| account.email.eq_ignore_ascii_case(email.trim()))
            .ok_or_else(|| {
                warn!("admin login for unknown account");
                PortalError::not_found("admin doesn't exists")
            })?;

        if !self.hasher.verify(password, &account.password_hash)? {
            warn!("admin login with wrong password");
            return Err(PortalError::unauthorized("password doesn't match"));
        }

        info!("admin logged in");
        Ok(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::credentials::Argon2Hasher;

    fn admin() -> AdminDirectory {
        let config = AdminConfig {
            email: "root@portal.test".to_string(),
            password: "s3cret".to_string(),
        };
        AdminDirectory::from_config(Some(&config), Arc::new(Argon2Hasher::default()))
            .expect("admin hashes")
    }

    #[test]
    fn gates_each_role() {
        let org = OrganisationId::generate();
        let seeker = JobSeekerId::generate();

        assert!(AuthContext::new(Role::Admin).require_admin().is_ok());
        assert!(AuthContext::anonymous().require_admin().is_err());
        assert_eq!(
            AuthContext::new(Role::Organisation(org))
                .require_organisation()
                .ok(),
            Some(org)
        );
        assert!(AuthContext::new(Role::JobSeeker(seeker))
            .require_organisation()
            .is_err());
        assert_eq!(
            AuthContext::new(Role::JobSeeker(seeker))
                .require_job_seeker()
                .ok(),
            Some(seeker)
        );
        assert!(matches!(
            AuthContext::new(Role::Admin).require_job_seeker(),
            Err(PortalError::Unauthorized(message)) if message == "Not Authenticated"
        ));
    }

    #[test]
    fn admin_login_checks_email_then_password() {
        let admin = admin();
        assert_eq!(
            admin.authenticate("ROOT@portal.test", "s3cret").ok(),
            Some(Role::Admin)
        );
        assert!(matches!(
            admin.authenticate("root@portal.test", "wrong"),
            Err(PortalError::Unauthorized(_))
        ));
        assert!(matches!(
            admin.authenticate("other@portal.test", "s3cret"),
            Err(PortalError::NotFound(_))
        ));
    }

    #[test]
    fn unconfigured_admin_rejects_everyone() {
        let admin = AdminDirectory::from_config(None, Arc::new(Argon2Hasher::default()))
            .expect("no hashing needed");
        assert!(!admin.is_configured());
        assert!(admin.authenticate("root@portal.test", "s3cret").is_err());
    }
}
