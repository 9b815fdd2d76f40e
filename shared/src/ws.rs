//! WebSocket 协议
//!
//! 连接后客户端先发送 `subscribe` 指令声明关注的房间，
//! 服务端以 `ready` 帧确认，此后按房间推送事件帧。

use serde::{Deserialize, Serialize};

use crate::event::FloorEvent;

/// Client → server commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsCommand {
    /// Join the given rooms (additive)
    Subscribe { rooms: Vec<String> },
    /// Leave the given rooms
    Unsubscribe { rooms: Vec<String> },
}

/// Server → client frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsFrame {
    /// Acknowledges the current room set
    Ready { rooms: Vec<String> },
    /// One room event
    Event { event: FloorEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_parses() {
        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"subscribe","rooms":["restaurant_restaurant:a"]}"#)
                .unwrap();
        match cmd {
            WsCommand::Subscribe { rooms } => assert_eq!(rooms.len(), 1),
            _ => panic!("expected subscribe"),
        }
    }
}
