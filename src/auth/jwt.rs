use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState, store::User};

/// Name of the session cookie set on login/register.
pub const TOKEN_COOKIE: &str = "token";

/// JWT payload. Stateless: everything the guard needs rides in the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signing/verification keys plus the session TTL.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(jwt.secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt.secret.as_bytes()),
            ttl: Duration::from_secs((jwt.ttl_hours as u64) * 3600),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = user.id, "jwt signed");
        Ok(token)
    }

    /// `None` on any signature mismatch or expiry; never propagates the
    /// library error to callers.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let validation = Validation::default();
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = data.claims.sub, "jwt verified");
                Some(data.claims)
            }
            Err(e) => {
                debug!(error = %e, "jwt rejected");
                None
            }
        }
    }
}

/// Authenticated principal attached to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Extracts the session token from `Authorization: Bearer` or the `token`
/// cookie; 401 when absent or invalid.
pub struct AuthUser(pub CurrentUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let bearer = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(t) => t,
            None => CookieJar::from_headers(&parts.headers)
                .get(TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))?,
        };

        let claims = keys.verify(&token).ok_or_else(|| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims.into()))
    }
}

/// `AuthUser` restricted to the admin role; 403 for everyone else.
pub struct AdminUser(pub CurrentUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != "admin" {
            warn!(user_id = user.id, role = %user.role, "admin route denied");
            return Err(ApiError::Forbidden("Insufficient permissions".into()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(24 * 3600),
        }
    }

    fn make_user() -> User {
        User {
            id: 7,
            username: "anna".into(),
            password_hash: "unused".into(),
            role: "admin".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(&make_user()).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "anna");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn tampered_signature_yields_none() {
        let keys = make_keys("dev-secret");
        let other = make_keys("other-secret");
        let token = other.sign(&make_user()).expect("sign");
        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn expired_token_yields_none() {
        let mut keys = make_keys("dev-secret");
        keys.ttl = Duration::from_secs(0);
        // exp == iat, and jsonwebtoken's default leeway is 60s, so back-date
        // further by signing with a negative ttl equivalent.
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: 1,
            username: "anna".into(),
            role: "user".into(),
            iat: (now - TimeDuration::hours(25)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn garbage_token_yields_none() {
        let keys = make_keys("dev-secret");
        assert!(keys.verify("not.a.jwt").is_none());
    }
}
