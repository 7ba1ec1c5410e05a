use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, state::AppState};

/// Fixed-window request counter keyed by client IP.
///
/// Blunt backpressure, not a security boundary: once a key exhausts its
/// quota inside the window, further requests get a 429 until the window
/// resets.
#[derive(Clone)]
pub struct RateLimiter {
    scope: &'static str,
    max: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(scope: &'static str, max: u32, window: Duration) -> Self {
        Self {
            scope,
            max,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a hit for `key`; `Err` carries the seconds until the window
    /// resets.
    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Opportunistic cleanup so the map does not grow without bound.
        if windows.len() > 4096 {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count >= self.max {
            let elapsed = now.duration_since(entry.started);
            let retry_secs = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(ApiError::RateLimited {
                scope: self.scope,
                retry_secs,
            });
        }
        entry.count += 1;
        Ok(())
    }
}

/// The three policies from `RateLimitConfig`, shared through `AppState`.
#[derive(Clone)]
pub struct Limiters {
    pub auth: RateLimiter,
    pub form: RateLimiter,
    pub api: RateLimiter,
}

impl Limiters {
    pub fn from_config(limits: &crate::config::RateLimitConfig) -> Self {
        Self {
            auth: RateLimiter::new("authentication", limits.auth_max, limits.auth_window()),
            form: RateLimiter::new("form submission", limits.form_max, limits.form_window()),
            api: RateLimiter::new("API", limits.api_max, limits.api_window()),
        }
    }
}

/// First hop of `X-Forwarded-For` when present, else the socket peer.
fn ip_from(headers: &HeaderMap, extensions: &axum::http::Extensions) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".into())
}

pub fn client_ip(parts: &Parts) -> String {
    ip_from(&parts.headers, &parts.extensions)
}

/// Layer applied to the whole `/api` router (general traffic policy).
pub async fn general(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let ip = ip_from(req.headers(), req.extensions());
    match state.limiters.api.check(&ip) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Guard extractor for the authentication policy (login/register).
pub struct AuthRateLimit;

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthRateLimit {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.limiters.auth.check(&client_ip(parts))?;
        Ok(AuthRateLimit)
    }
}

/// Guard extractor for the form-submission policy (contact/adventure posts).
pub struct FormRateLimit;

#[axum::async_trait]
impl FromRequestParts<AppState> for FormRateLimit {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.limiters.form.check(&client_ip(parts))?;
        Ok(FormRateLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_hit_in_window_is_rejected() {
        let limiter = RateLimiter::new("form submission", 5, Duration::from_secs(3600));
        for _ in 0..5 {
            assert!(limiter.check("203.0.113.7").is_ok());
        }
        let err = limiter.check("203.0.113.7").unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { .. }));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new("authentication", 1, Duration::from_secs(900));
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.2").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn window_expiry_resets_quota() {
        let limiter = RateLimiter::new("API", 1, Duration::from_millis(10));
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("10.0.0.1").is_ok());
    }
}
