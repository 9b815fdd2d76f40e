//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurant`] - 餐厅级平面图与排期接口
//! - [`tables`] - 桌台管理与指派接口
//! - [`reservations`] - 可用性检查与预订接口
//! - [`events`] - WebSocket 实时事件订阅

pub mod convert;

pub mod events;
pub mod health;
pub mod reservations;
pub mod restaurant;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(restaurant::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(events::router())
        .with_state(state)
}
