//! Auth API Module

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

/// Auth router. `register` and `login` are public; `me` requires a token
/// (enforced by the auth middleware).
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
