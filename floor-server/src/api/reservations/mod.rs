//! Reservation API 模块
//!
//! `/check_Availability` 与 `/create_Reservation` 的路径大小写保持兼容。

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/check_Availability", post(handler::check_availability))
        .route("/create_Reservation", post(handler::create_reservation))
        .route("/reservations/{id}/status", put(handler::update_status))
        .route("/reservations/{id}/cancel", put(handler::cancel))
}
