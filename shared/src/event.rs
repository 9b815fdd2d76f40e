//! 实时事件类型定义
//!
//! 事件通过命名房间 (room) 定向推送：
//!
//! - `restaurant_<id>` — 某餐厅的所有订阅者 (店内平面图、前台)
//! - `customer_<email>` — 某位顾客的个人通道
//!
//! 事件是单向、尽力而为的旁路通知，永远不参与业务操作的成败。

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::util::now_millis;

/// Event action discriminator
///
/// The serialized names are part of the wire contract; clients dispatch on
/// them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAction {
    TableAdded,
    TablePositionUpdated,
    TableDetailsUpdated,
    TableDeleted,
    TableStatusUpdated,
    ReservationAssigned,
    OrderCancelled,
    FloorLayoutUpdated,
    /// Customer-scoped companion of [`EventAction::ReservationAssigned`]
    TableAssigned,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::TableAdded => "tableAdded",
            EventAction::TablePositionUpdated => "tablePositionUpdated",
            EventAction::TableDetailsUpdated => "tableDetailsUpdated",
            EventAction::TableDeleted => "tableDeleted",
            EventAction::TableStatusUpdated => "tableStatusUpdated",
            EventAction::ReservationAssigned => "reservationAssigned",
            EventAction::OrderCancelled => "orderCancelled",
            EventAction::FloorLayoutUpdated => "floorLayoutUpdated",
            EventAction::TableAssigned => "tableAssigned",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 房间事件体
///
/// `seq` 由事件中心按房间单调递增，订阅者据此判断事件先后。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorEvent {
    pub event_id: Uuid,
    pub action: EventAction,
    pub room: String,
    /// Per-room monotonic sequence number, assigned on publish
    pub seq: u64,
    /// Server timestamp, Unix millis
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl FloorEvent {
    /// 创建事件 (seq 在发布时由事件中心填充)
    pub fn new(action: EventAction, room: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            action,
            room: room.into(),
            seq: 0,
            timestamp: now_millis(),
            data,
        }
    }
}

/// Restaurant-scoped room name
pub fn restaurant_room(restaurant_id: &str) -> String {
    format!("restaurant_{restaurant_id}")
}

/// Customer-scoped room name, keyed by notification email
pub fn customer_room(email: &str) -> String {
    format!("customer_{}", email.trim().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_match_wire_contract() {
        assert_eq!(EventAction::TableAdded.to_string(), "tableAdded");
        assert_eq!(EventAction::OrderCancelled.to_string(), "orderCancelled");
        assert_eq!(
            serde_json::to_value(EventAction::ReservationAssigned).unwrap(),
            "reservationAssigned"
        );
    }

    #[test]
    fn room_names() {
        assert_eq!(restaurant_room("restaurant:abc"), "restaurant_restaurant:abc");
        assert_eq!(customer_room(" Ana@Mail.com "), "customer_ana@mail.com");
    }

    #[test]
    fn event_roundtrip() {
        let ev = FloorEvent::new(
            EventAction::TableStatusUpdated,
            restaurant_room("restaurant:x"),
            Some(serde_json::json!({ "status": "occupied" })),
        );
        let bytes = serde_json::to_vec(&ev).unwrap();
        let back: FloorEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, ev);
    }
}
