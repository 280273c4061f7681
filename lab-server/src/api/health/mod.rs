//! Health API Module

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

/// Health router (public route)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(handler::health))
}
