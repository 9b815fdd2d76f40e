//! Event Notifier
//!
//! 把业务变更翻译成房间事件：每个成功的变更操作恰好发布一条
//! 餐厅域事件；指派另外向可解析邮箱的顾客推送 `tableAssigned`。
//! 事件构造或投递的任何失败都不影响业务操作本身。

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use shared::event::{EventAction, FloorEvent, customer_room, restaurant_room};
use surrealdb::RecordId;

use super::hub::EventHub;
use crate::booking::ClientDirectory;
use crate::db::models::{DiningTable, Reservation};

/// Publishes state-change notifications to restaurant and customer rooms
pub struct EventNotifier {
    hub: Arc<EventHub>,
    directory: Arc<dyn ClientDirectory>,
}

impl EventNotifier {
    pub fn new(hub: Arc<EventHub>, directory: Arc<dyn ClientDirectory>) -> Self {
        Self { hub, directory }
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    // ========== Table Registry events ==========

    pub fn table_added(&self, table: &DiningTable) {
        self.emit_restaurant(&table.restaurant, EventAction::TableAdded, table);
    }

    pub fn table_position_updated(&self, table: &DiningTable) {
        self.emit_restaurant(&table.restaurant, EventAction::TablePositionUpdated, table);
    }

    pub fn table_details_updated(&self, table: &DiningTable) {
        self.emit_restaurant(&table.restaurant, EventAction::TableDetailsUpdated, table);
    }

    pub fn table_status_updated(&self, table: &DiningTable) {
        self.emit_restaurant(&table.restaurant, EventAction::TableStatusUpdated, table);
    }

    pub fn table_deleted(&self, restaurant: &RecordId, table_id: &str, number: i32) {
        self.emit_restaurant(
            restaurant,
            EventAction::TableDeleted,
            &json!({ "id": table_id, "number": number }),
        );
    }

    pub fn floor_layout_updated(&self, restaurant: &RecordId, tables: &[DiningTable]) {
        self.emit_restaurant(restaurant, EventAction::FloorLayoutUpdated, &tables);
    }

    // ========== Assignment / reservation events ==========

    /// `reservationAssigned` to the restaurant room; additionally
    /// `tableAssigned` to the customer room when an email resolves
    pub async fn reservation_assigned(&self, reservation: &Reservation, table: &DiningTable) {
        let payload = json!({
            "reservation": reservation,
            "table": { "id": table.id.as_ref().map(|t| t.to_string()),
                       "number": table.number,
                       "status": table.status },
        });
        self.emit_restaurant(&reservation.restaurant, EventAction::ReservationAssigned, &payload);

        match self.directory.notification_email(&reservation.client).await {
            Ok(Some(email)) => {
                self.emit(
                    customer_room(&email),
                    EventAction::TableAssigned,
                    &json!({
                        "reservation": reservation,
                        "table_number": table.number,
                    }),
                );
            }
            Ok(None) => {
                tracing::debug!("Assigned reservation has no resolvable customer email");
            }
            Err(e) => {
                tracing::warn!("Failed to resolve customer email for notification: {e}");
            }
        }
    }

    /// Cancellation notification, addressed to the restaurant
    pub async fn order_cancelled(&self, reservation: &Reservation) {
        let client_name = self
            .directory
            .display_name(&reservation.client)
            .await
            .unwrap_or_default();
        let payload = json!({
            "reservation": reservation,
            "client_name": client_name,
        });
        self.emit_restaurant(&reservation.restaurant, EventAction::OrderCancelled, &payload);
    }

    // ========== internals ==========

    fn emit_restaurant<T: Serialize>(&self, restaurant: &RecordId, action: EventAction, data: &T) {
        self.emit(restaurant_room(&restaurant.to_string()), action, data);
    }

    fn emit<T: Serialize>(&self, room: String, action: EventAction, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%action, "Failed to serialize event payload: {e}");
                None
            }
        };
        let event = self.hub.publish(FloorEvent::new(action, room, data));
        tracing::debug!(action = %event.action, room = %event.room, seq = event.seq, "Event published");
    }
}
