//! Restaurant floor API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/restaurant/{id}/tables", get(handler::list_tables))
        .route(
            "/restaurant/{id}/floor-layout",
            get(handler::floor_layout).put(handler::save_layout),
        )
}
