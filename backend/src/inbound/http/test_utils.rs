//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use super::session::SessionContext;
use crate::domain::{Error, Principal, Role, UserId};

/// Path of the helper route that signs a principal into the session.
pub const LOGIN_PATH: &str = "/test/login";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Principal used by handler tests.
pub fn principal(id: &str, name: &str, roles: &[Role]) -> Principal {
    Principal::new(
        UserId::new(id).expect("fixture user id"),
        name,
        roles.iter().copied(),
    )
    .expect("fixture principal")
}

/// Route that stands in for the identity provider: it writes the principal
/// given as JSON into the session.
pub fn login_route(cfg: &mut web::ServiceConfig) {
    cfg.route(
        LOGIN_PATH,
        web::post().to(
            |session: SessionContext, body: web::Json<LoginBody>| async move {
                let body = body.into_inner();
                let roles = body
                    .roles
                    .iter()
                    .map(|raw| raw.parse::<Role>())
                    .collect::<Result<Vec<_>, _>>()
                    .expect("fixture roles");
                let principal = principal(&body.user_id, &body.display_name, &roles);
                session.persist_principal(&principal)?;
                Ok::<_, Error>(HttpResponse::Ok())
            },
        ),
    );
}

/// Body accepted by [`login_route`].
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub user_id: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

impl LoginBody {
    pub fn new(user_id: &str, display_name: &str, roles: &[Role]) -> Self {
        Self {
            user_id: user_id.to_owned(),
            display_name: display_name.to_owned(),
            roles: roles.iter().map(|role| role.as_str().to_owned()).collect(),
        }
    }
}
