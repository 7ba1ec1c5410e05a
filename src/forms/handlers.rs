use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use super::dto::{AdventurePayload, ContactPayload, SubmitResponse};
use super::validate;
use crate::{
    auth::AdminUser,
    csrf::CsrfGuard,
    error::{ApiError, ApiJson},
    notify,
    rate_limit::FormRateLimit,
    state::AppState,
    store::{AdventureSubmission, ContactSubmission},
};

/// POST /api/contact — validate → sanitize → persist → notify → respond.
///
/// Notification is best-effort: the record is durable before the mail is
/// attempted, and a failed send never turns the 201 into an error.
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    _csrf: CsrfGuard,
    _limit: FormRateLimit,
    ApiJson(payload): ApiJson<ContactPayload>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    validate::validate_contact(&payload).map_err(ApiError::Validation)?;

    let record = state
        .store
        .create_contact_submission(payload.into_sanitized())
        .await?;
    info!(id = record.id, "contact submission stored");

    let delivery = state.mailer.send(notify::contact_email(&record)).await;
    if !delivery.success {
        warn!(id = record.id, message = %delivery.message, "contact notification failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id: record.id,
        }),
    ))
}

/// POST /api/adventure — same pipeline as /contact for the package builder.
#[instrument(skip_all)]
pub async fn submit_adventure(
    State(state): State<AppState>,
    _csrf: CsrfGuard,
    _limit: FormRateLimit,
    ApiJson(payload): ApiJson<AdventurePayload>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    validate::validate_adventure(&payload).map_err(ApiError::Validation)?;

    let record = state
        .store
        .create_adventure_submission(payload.into_sanitized())
        .await?;
    info!(id = record.id, "adventure submission stored");

    let delivery = state.mailer.send(notify::adventure_email(&record)).await;
    if !delivery.success {
        warn!(id = record.id, message = %delivery.message, "adventure notification failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id: record.id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_contact(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<ContactSubmission>>, ApiError> {
    info!(admin_id = admin.id, "listing contact submissions");
    Ok(Json(state.store.get_contact_submissions().await?))
}

#[instrument(skip(state))]
pub async fn list_adventure(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<AdventureSubmission>>, ApiError> {
    info!(admin_id = admin.id, "listing adventure submissions");
    Ok(Json(state.store.get_adventure_submissions().await?))
}
