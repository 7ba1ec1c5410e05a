use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::{JwtKeys, TOKEN_COOKIE},
        password,
    },
    error::{ApiError, ApiJson, FieldError},
    rate_limit::AuthRateLimit,
    sanitize,
    state::AppState,
    store::{NewUser, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.production)
        .max_age(time::Duration::hours(state.config.jwt.ttl_hours))
        .build()
}

fn auth_success(state: &AppState, user: &User) -> Result<(Cookie<'static>, AuthResponse), ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user)?;
    Ok((
        session_cookie(state, token),
        AuthResponse {
            success: true,
            user: PublicUser {
                id: user.id,
                username: user.username.clone(),
                role: user.role.clone(),
            },
        },
    ))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    jar: CookieJar,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let username = sanitize::clean(Some(&payload.username));

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    }
    for violation in password::policy_violations(&payload.password) {
        errors.push(FieldError::new("password", violation));
    }
    if payload.password != payload.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }
    if !errors.is_empty() {
        warn!(username = %username, "registration rejected by validation");
        return Err(ApiError::Validation(errors));
    }

    if state.store.get_user_by_username(&username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(ApiError::Validation(vec![FieldError::new(
            "username",
            "Username is already taken",
        )]));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = state
        .store
        .create_user(NewUser {
            username,
            password_hash,
            role: "user".into(),
        })
        .await?;

    let (cookie, response) = auth_success(&state, &user)?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, jar.add(cookie), Json(response)))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let username = sanitize::clean(Some(&payload.username));

    // Unknown username and wrong password must be indistinguishable to the
    // client, so both collapse into the same generic 401.
    let user = state.store.get_user_by_username(&username).await?;
    let valid = match &user {
        Some(u) => password::verify_password(&payload.password, &u.password_hash)?,
        None => false,
    };
    let Some(user) = user.filter(|_| valid) else {
        warn!(username = %username, "login failed");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };

    let (cookie, response) = auth_success(&state, &user)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((jar.add(cookie), Json(response)))
}

#[instrument(skip_all)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let cookie = Cookie::build((TOKEN_COOKIE, "")).path("/").build();
    (
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    )
}
