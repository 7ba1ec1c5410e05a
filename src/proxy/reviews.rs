use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, instrument};

use crate::{csrf::CsrfGuard, error::ApiError, state::AppState};

const PLACES_BASE: &str = "https://maps.googleapis.com/maps/api/place/details/json";

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    result: Option<PlaceResult>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    reviews: Vec<PlaceReview>,
}

#[derive(Debug, Deserialize)]
struct PlaceReview {
    author_name: String,
    #[serde(default)]
    profile_photo_url: Option<String>,
    rating: f32,
    #[serde(default)]
    text: String,
    #[serde(default)]
    relative_time_description: Option<String>,
}

/// Review reshaped into the site's testimonial format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub author: String,
    pub avatar: Option<String>,
    pub rating: f32,
    pub text: String,
    pub date: Option<String>,
    pub source: &'static str,
}

/// GET /api/google-reviews — proxies Google Places reviews for the
/// testimonial section.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    _csrf: CsrfGuard,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(places) = state.config.google_places.as_ref() else {
        return Err(ApiError::Upstream("Google Places not configured".into()));
    };

    let response = state
        .http
        .get(PLACES_BASE)
        .query(&[
            ("place_id", places.place_id.as_str()),
            ("fields", "reviews"),
            ("key", places.api_key.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            error!(error = %e.to_string().replace(&places.api_key, "***"), "places request failed");
            ApiError::Upstream("reviews service unreachable".into())
        })?;

    let payload: PlacesResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("invalid places response: {e}")))?;

    if payload.status != "OK" {
        return Err(ApiError::Upstream(format!(
            "places API status {}",
            payload.status
        )));
    }

    let reviews: Vec<Testimonial> = payload
        .result
        .map(|r| r.reviews)
        .unwrap_or_default()
        .into_iter()
        .map(|r| Testimonial {
            author: r.author_name,
            avatar: r.profile_photo_url,
            rating: r.rating,
            text: r.text,
            date: r.relative_time_description,
            source: "google",
        })
        .collect();

    Ok(Json(json!({ "reviews": reviews })))
}
