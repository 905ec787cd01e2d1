use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod login;

pub const ADMIN_COOKIE: &str = "signups_admin";

/// Proof that the request comes from someone who entered the admin password.
///
/// Sessions last until the browser drops the cookie or the user logs out.
#[derive(Debug, Clone)]
pub struct Admin {
    pub since: DateTime<Utc>,
}

#[derive(Debug)]
pub enum AuthError {
    CookieMissingOrMalformed,
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(?self, "sending visitor to the admin login");
        Redirect::to("/admin/login").into_response()
    }
}

#[derive(Serialize, Deserialize)]
pub struct AdminSession {
    since: DateTime<Utc>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar<Key> =
            PrivateCookieJar::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthError::CookieMissingOrMalformed)?;

        let cookie = match jar.get(ADMIN_COOKIE) {
            Some(cookie) => cookie,
            None => return Err(AuthError::Unauthorized),
        };

        match serde_json::from_str::<AdminSession>(cookie.value()) {
            Ok(session) => Ok(Admin {
                since: session.since,
            }),
            Err(_) => Err(AuthError::CookieMissingOrMalformed),
        }
    }
}

pub fn set_admin_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let session = AdminSession { since: Utc::now() };
    // serializing a struct of one timestamp does not fail
    let value = serde_json::to_string(&session).unwrap_or_default();
    jar.add(
        Cookie::build((ADMIN_COOKIE, value))
            .path("/")
            .http_only(true)
            .build(),
    )
}

pub fn clear_admin_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(ADMIN_COOKIE).path("/").build())
}
