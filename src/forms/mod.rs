mod dto;
pub mod handlers;
pub mod validate;

pub use dto::{AdventurePayload, ContactPayload};

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/contact",
            post(handlers::submit_contact).get(handlers::list_contact),
        )
        .route(
            "/adventure",
            post(handlers::submit_adventure).get(handlers::list_adventure),
        )
}
