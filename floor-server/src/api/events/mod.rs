//! Event WebSocket endpoint — 实时房间事件推送
//!
//! GET /ws
//!
//! 协议:
//! - Client → Server: [`WsCommand`] (Subscribe / Unsubscribe)
//! - Server → Client: [`WsFrame`] (Ready, Event)
//!
//! 每个订阅的房间由一个转发任务桥接到会话通道；
//! 订阅者消费过慢 (Lagged) 时重新订阅而不是断开。

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use shared::ws::{WsCommand, WsFrame};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::notify::EventHub;

/// 会话通道容量 — 足以缓冲突发事件
const SESSION_CHANNEL_CAPACITY: usize = 64;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(ws_handler))
}

/// GET /ws — upgrade to WebSocket
async fn ws_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    tracing::info!("Event subscriber connected");

    let hub = state.notifier.hub().clone();
    let shutdown = hub.shutdown_token().clone();

    // 每个房间一个转发任务，统一汇入会话通道
    let (frame_tx, mut frame_rx) = mpsc::channel::<WsFrame>(SESSION_CHANNEL_CAPACITY);
    let mut rooms: HashMap<String, CancellationToken> = HashMap::new();

    let mut ping_interval = tokio::time::interval(Duration::from_secs(30));
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            frame = frame_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if let Ok(json) = serde_json::to_string(&frame)
                            && sink.send(Message::Text(json.into())).await.is_err()
                        {
                            break;
                        }
                    }
                    None => break, // channel closed
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_command(&text, &hub, &frame_tx, &mut rooms);
                        let ready = WsFrame::Ready {
                            rooms: rooms.keys().cloned().collect(),
                        };
                        if let Ok(json) = serde_json::to_string(&ready)
                            && sink.send(Message::Text(json.into())).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {e}");
                        break;
                    }
                    _ => {} // Binary, Pong — ignore
                }
            }
        }
    }

    for token in rooms.into_values() {
        token.cancel();
    }
    let _ = sink.close().await;
    tracing::info!("Event subscriber disconnected");
}

fn handle_command(
    text: &str,
    hub: &Arc<EventHub>,
    frame_tx: &mpsc::Sender<WsFrame>,
    rooms: &mut HashMap<String, CancellationToken>,
) {
    let cmd: WsCommand = match serde_json::from_str(text) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Invalid WsCommand: {e}");
            return;
        }
    };

    match cmd {
        WsCommand::Subscribe { rooms: wanted } => {
            for room in wanted {
                if rooms.contains_key(&room) {
                    continue;
                }
                let token = CancellationToken::new();
                tokio::spawn(forward_room(
                    hub.clone(),
                    room.clone(),
                    frame_tx.clone(),
                    token.clone(),
                ));
                rooms.insert(room, token);
            }
        }
        WsCommand::Unsubscribe { rooms: gone } => {
            for room in gone {
                if let Some(token) = rooms.remove(&room) {
                    token.cancel();
                }
            }
        }
    }
}

/// 把一个房间的事件桥接到会话通道
async fn forward_room(
    hub: Arc<EventHub>,
    room: String,
    tx: mpsc::Sender<WsFrame>,
    token: CancellationToken,
) {
    let mut rx = hub.subscribe(&room);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,

            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if tx.send(WsFrame::Event { event }).await.is_err() {
                            break; // session gone
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(room = %room, lagged = n, "Event subscriber lagged, resubscribing");
                        rx = hub.subscribe(&room);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
