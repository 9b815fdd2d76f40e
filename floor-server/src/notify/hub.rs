//! EventHub — 房间事件实时分发
//!
//! ```text
//! Registry / Coordinator / ReservationService
//!       │ publish(event)
//!       ▼
//! EventHub
//!   ├── rooms: room → broadcast::Sender<FloorEvent>
//!   ├── seq:   room → 单调递增序号
//!   │           │
//!   │           ▼
//!   └── WebSocket handler (subscribe → 过滤 → 推送)
//! ```
//!
//! 发布是尽力而为的旁路：房间没有订阅者时 send 返回 Err，安全忽略。

use dashmap::DashMap;
use shared::event::FloorEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Broadcast channel 容量 — 足以缓冲连接时突发
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Room-scoped fan-out hub
#[derive(Debug)]
pub struct EventHub {
    /// room → broadcast sender
    rooms: DashMap<String, broadcast::Sender<FloorEvent>>,
    /// room → last published sequence number
    seq: DashMap<String, u64>,
    capacity: usize,
    shutdown_token: CancellationToken,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            seq: DashMap::new(),
            capacity: capacity.max(1),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 订阅一个房间 (没有则建立通道)
    pub fn subscribe(&self, room: &str) -> broadcast::Receiver<FloorEvent> {
        self.rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 发布事件到其房间，填充按房间递增的 seq
    ///
    /// 返回实际发布的事件 (带 seq)。投递失败只记日志，绝不上抛。
    pub fn publish(&self, mut event: FloorEvent) -> FloorEvent {
        let seq = {
            let mut entry = self.seq.entry(event.room.clone()).or_insert(0);
            *entry += 1;
            *entry
        };
        event.seq = seq;

        if let Some(tx) = self.rooms.get(&event.room) {
            // 无订阅者时 send 返回 Err，安全忽略
            if let Err(e) = tx.send(event.clone()) {
                tracing::debug!(room = %event.room, "No active subscribers: {e}");
            }
        }
        event
    }

    /// 当前房间的最后序号 (测试与诊断)
    pub fn last_seq(&self, room: &str) -> u64 {
        self.seq.get(room).map(|v| *v).unwrap_or(0)
    }

    /// 关闭令牌 (WebSocket 会话监听此信号退出)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭：通知所有订阅会话退出
    pub fn shutdown(&self) {
        tracing::info!("Shutting down event hub");
        self.shutdown_token.cancel();
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::event::EventAction;

    fn event(room: &str) -> FloorEvent {
        FloorEvent::new(EventAction::TableAdded, room, None)
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = EventHub::new();
        let published = hub.publish(event("restaurant_restaurant:a"));
        assert_eq!(published.seq, 1);
    }

    #[tokio::test]
    async fn sequence_is_per_room_and_monotonic() {
        let hub = EventHub::new();
        let room_a = "restaurant_restaurant:a";
        let room_b = "restaurant_restaurant:b";

        assert_eq!(hub.publish(event(room_a)).seq, 1);
        assert_eq!(hub.publish(event(room_a)).seq, 2);
        assert_eq!(hub.publish(event(room_b)).seq, 1);
        assert_eq!(hub.last_seq(room_a), 2);
    }

    #[tokio::test]
    async fn subscriber_receives_room_events_only() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe("restaurant_restaurant:a");

        hub.publish(event("restaurant_restaurant:a"));
        hub.publish(event("restaurant_restaurant:b"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.room, "restaurant_restaurant:a");
        assert!(rx.try_recv().is_err());
    }
}
