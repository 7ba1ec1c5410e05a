use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use crate::{error::ApiError, sanitize, state::AppState};

const WEATHER_BASE: &str = "https://api.weatherapi.com/v1/current.json";

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/weather?query= — proxies the upstream weather API. Upstream
/// error payloads are forwarded verbatim; the API key never appears in
/// logs or responses.
#[instrument(skip(state, params))]
pub async fn current(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> Result<Response, ApiError> {
    let location = sanitize::clean(params.query.as_deref());
    if location.is_empty() {
        return Err(ApiError::BadRequest("query parameter is required".into()));
    }

    let Some(api_key) = state.config.weather_api_key.as_deref() else {
        return Err(ApiError::Upstream("weather API key not configured".into()));
    };

    info!(location = %location, url = %format!("{WEATHER_BASE}?key=***&q={location}"), "weather lookup");

    let response = state
        .http
        .get(WEATHER_BASE)
        .query(&[("key", api_key), ("q", &location)])
        .send()
        .await
        .map_err(|e| {
            // reqwest errors can embed the request URL, which carries the key.
            error!(error = %mask_key(&e.to_string(), api_key), "weather request failed");
            ApiError::Upstream("weather service unreachable".into())
        })?;

    let status = response.status().as_u16();
    let body: Value = response.json().await.unwrap_or_else(|_| {
        json!({ "success": false, "message": "invalid upstream response" })
    });

    let status =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(body)).into_response())
}

fn mask_key(text: &str, key: &str) -> String {
    text.replace(key, "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_hides_the_secret() {
        let masked = mask_key("error for url ?key=abc123&q=Kiruna", "abc123");
        assert!(!masked.contains("abc123"));
        assert!(masked.contains("?key=***"));
    }
}
