//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The identity provider writes the authenticated principal into the signed
//! cookie session. This wrapper reads it back so handlers only ever see a
//! domain [`Principal`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const DISPLAY_NAME_KEY: &str = "display_name";
pub(crate) const ROLES_KEY: &str = "roles";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the principal in the session cookie.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        let roles: Vec<&str> = principal.roles().iter().map(|role| role.as_str()).collect();
        self.insert(USER_ID_KEY, principal.user_id().as_ref())?;
        self.insert(DISPLAY_NAME_KEY, principal.display_name())?;
        self.insert(ROLES_KEY, roles)
    }

    fn insert(&self, key: &str, value: impl serde::Serialize) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Fetch the principal from the session, if a valid one is present.
    ///
    /// Malformed entries are logged and treated as absent.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        let Some(raw_id) = self.get::<String>(USER_ID_KEY)? else {
            return Ok(None);
        };
        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let display_name = self.get::<String>(DISPLAY_NAME_KEY)?.unwrap_or_default();
        let raw_roles = self.get::<Vec<String>>(ROLES_KEY)?.unwrap_or_default();
        let roles = match raw_roles
            .iter()
            .map(|raw| raw.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(roles) => roles,
            Err(error) => {
                warn!(%error, "invalid role in session cookie");
                return Ok(None);
            }
        };

        match Principal::new(user_id, display_name, roles) {
            Ok(principal) => Ok(Some(principal)),
            Err(error) => {
                warn!(%error, "invalid principal in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated principal or return `401 Unauthorized`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthenticated("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
