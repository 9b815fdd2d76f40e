//! Table API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/tables", post(handler::create))
        .route("/tables/assign", post(handler::assign))
        .route("/tables/{table_id}", delete(handler::delete))
        .route("/tables/{table_id}/reservations", get(handler::reservations))
        .route("/tables/{table_id}/position", put(handler::update_position))
        .route("/tables/{table_id}/details", put(handler::update_details))
        .route("/tables/{table_id}/status", put(handler::set_status))
}
