//! Floor Server 共享类型库
//!
//! 服务端与客户端之间共享的线上类型：
//!
//! - **响应封装** (`response`): HTTP API 统一响应结构
//! - **实时事件** (`event`): 房间事件及房间命名
//! - **WebSocket 协议** (`ws`): 订阅指令与下行帧
//! - **工具** (`util`): 时间戳辅助函数

pub mod event;
pub mod response;
pub mod util;
pub mod ws;

pub use event::{EventAction, FloorEvent, customer_room, restaurant_room};
pub use response::Envelope;
pub use ws::{WsCommand, WsFrame};
