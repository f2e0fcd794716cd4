//! API routes

pub mod scientific_name;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/scientific-name", post(scientific_name::scientific_name))
}
