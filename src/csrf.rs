use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// GET /api/csrf-token — mints a double-submit token. The client echoes it
/// back in the `X-CSRF-Token` header on state-changing requests.
pub async fn issue(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();

    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(state.config.production)
        .build();

    (jar.add(cookie), Json(json!({ "csrfToken": token })))
}

/// Guard extractor: the header token must match the cookie token.
pub struct CsrfGuard;

#[axum::async_trait]
impl FromRequestParts<AppState> for CsrfGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(CSRF_COOKIE).map(|c| c.value().to_string());
        let header = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match (cookie, header) {
            (Some(c), Some(h)) if !c.is_empty() && c == h => Ok(CsrfGuard),
            _ => Err(ApiError::Csrf),
        }
    }
}
