pub mod reviews;
pub mod weather;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather::current))
        .route("/google-reviews", get(reviews::list))
}
