use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

use messagewall_types::models::Identity;

pub const IDENTITY_COOKIE: &str = "uid";

/// Lifetime of a freshly issued identity cookie.
pub const IDENTITY_MAX_AGE: time::Duration = time::Duration::days(365);

/// Attaches an [`Identity`] to every request.
///
/// A returning client's `uid` cookie is trusted as-is. A client without one
/// gets a new random v4 UUID, set on the response as an HttpOnly, SameSite=Lax
/// cookie that lasts a year.
pub async fn assign_identity(jar: CookieJar, mut req: Request, next: Next) -> Response {
    let existing = jar
        .get(IDENTITY_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .map(Identity::new);

    if let Some(identity) = existing {
        req.extensions_mut().insert(identity);
        return next.run(req).await;
    }

    let identity = Identity::new(Uuid::new_v4().to_string());
    debug!("Issued new identity {}", identity);
    req.extensions_mut().insert(identity.clone());

    let response = next.run(req).await;

    let cookie = Cookie::build((IDENTITY_COOKIE, identity.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(IDENTITY_MAX_AGE);

    (jar.add(cookie), response).into_response()
}
