//! Order API Module

mod handler;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/stats", get(handler::stats))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", get(handler::get_status))
        .route("/{id}/advance", patch(handler::advance))
        .route("/{id}/add-service", post(handler::add_service))
        .route("/{id}/add-comment", post(handler::add_comment))
}
