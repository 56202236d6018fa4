//! Cookie sessions mapping an opaque token onto a [`Role`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::{Cookie, HeaderMapExt};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::auth::{AuthContext, Role};
use super::error::PortalError;
use super::repository::{PortalStore, RepositoryError};
use super::service::JobPortal;
use crate::config::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    role: Role,
    issued_at: DateTime<Utc>,
}

/// In-process session table. Entries expire after the configured TTL.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<SessionToken, SessionEntry>>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            entries: Arc::default(),
            config,
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<SessionToken, SessionEntry>>, PortalError> {
        self.entries.lock().map_err(|_| {
            PortalError::from(RepositoryError::Unavailable(
                "session store poisoned".to_string(),
            ))
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn issue(&self, role: Role) -> Result<SessionToken, PortalError> {
        self.issue_at(role, Utc::now())
    }

    /// Issuing also sweeps out every session that has outlived the TTL, so abandoned
    /// tokens do not accumulate.
    pub fn issue_at(&self, role: Role, now: DateTime<Utc>) -> Result<SessionToken, PortalError> {
        let token = SessionToken::generate();
        let ttl = self.config.ttl();
        let mut entries = self.entries()?;
        entries.retain(|_, entry| now - entry.issued_at < ttl);
        entries.insert(
            token,
            SessionEntry {
                role,
                issued_at: now,
            },
        );
        Ok(token)
    }

    pub fn resolve(&self, token: &SessionToken) -> Result<Option<Role>, PortalError> {
        self.resolve_at(token, Utc::now())
    }

    /// Expired sessions are dropped on first sight.
    pub fn resolve_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<Role>, PortalError> {
        let mut entries = self.entries()?;
        match entries.get(token).copied() {
            Some(entry) if now - entry.issued_at < self.config.ttl() => Ok(Some(entry.role)),
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn revoke(&self, token: &SessionToken) -> Result<bool, PortalError> {
        Ok(self.entries()?.remove(token).is_some())
    }

    pub fn set_cookie(&self, token: &SessionToken) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.config.cookie_name,
            token,
            self.config.ttl().num_seconds()
        )
    }

    pub fn expired_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.config.cookie_name
        )
    }

    /// Read the session token, if any, from the request's `Cookie` header.
    pub fn token_from_parts(&self, parts: &Parts) -> Option<SessionToken> {
        parts
            .headers
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(self.cookie_name()).map(str::to_string))
            .and_then(|raw| raw.parse().ok())
    }
}

/// The session behind the current request, if it is still live.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession {
    pub auth: AuthContext,
    pub token: Option<SessionToken>,
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<JobPortal<S>>> for CurrentSession
where
    S: PortalStore + 'static,
{
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<JobPortal<S>>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = portal.sessions.token_from_parts(parts) else {
            return Ok(Self {
                auth: AuthContext::anonymous(),
                token: None,
            });
        };

        match portal.sessions.resolve(&token)? {
            Some(role) => Ok(Self {
                auth: AuthContext::new(role),
                token: Some(token),
            }),
            None => Ok(Self {
                auth: AuthContext::anonymous(),
                token: None,
            }),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<JobPortal<S>>> for AuthContext
where
    S: PortalStore + 'static,
{
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<JobPortal<S>>,
    ) -> Result<Self, Self::Rejection> {
        CurrentSession::from_request_parts(parts, portal)
            .await
            .map(|session| session.auth)
    }
}
