//! 预订核心 - 桌台可用性与预订指派引擎
//!
//! # 组件
//!
//! - [`TableRegistry`] - 桌台登记：CRUD 与状态机
//! - [`ReservationService`] - 预订存储：创建、状态流转、取消
//! - [`AvailabilityEngine`] - 可用性引擎：重叠检测与备选时段搜索
//! - [`AssignmentCoordinator`] - 指派协调：容量/冲突校验与乐观并发写入
//!
//! 数据流：预订请求 → 可用性引擎 (占用集 = 重叠预订的桌台) →
//! 指派协调器落库并驱动桌台状态 → 事件中心对外广播。

pub mod assignment;
pub mod availability;
pub mod error;
pub mod interval;
pub mod registry;
pub mod reservations;

#[cfg(test)]
mod tests;

pub use assignment::AssignmentCoordinator;
pub use availability::{AlternativeSlot, AvailabilityEngine, AvailabilityReport, AvailableTable};
pub use error::{BookingError, BookingResult};
pub use interval::TimeSlot;
pub use registry::{TableMove, TableRegistry};
pub use reservations::{NewReservation, ReservationService};

use async_trait::async_trait;

use crate::db::models::ClientRef;
use crate::db::repository::RepoResult;

/// 预订默认时长 (分钟)
pub const DEFAULT_RESERVATION_MINUTES: i64 = 90;

/// 备选时段距离打烊时间的最小余量 (分钟)
pub const CLOSING_BUFFER_MINUTES: u16 = 120;

/// 备选时段偏移表 (分钟)
///
/// 顺序即提议顺序：距离近的在前，距离相同时较早的时段在前。
pub const ALTERNATIVE_OFFSETS: [i32; 6] = [-30, 30, -60, 60, -90, 90];

/// Client identity lookup
///
/// The reservation's client is a tagged registered/guest reference; the
/// core resolves either variant through this seam and never branches on
/// record shape.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn display_name(&self, client: &ClientRef) -> RepoResult<Option<String>>;
    async fn notification_email(&self, client: &ClientRef) -> RepoResult<Option<String>>;
}
