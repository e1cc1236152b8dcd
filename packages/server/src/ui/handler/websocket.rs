//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, InboundEvent},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// メッセージは MessagePusher に渡された順にそのまま書き出す。
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.register_connection_usecase.execute(tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &connection_id_clone, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let notified = state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
    tracing::info!(
        "Connection '{}' closed ({} member(s) notified)",
        connection_id,
        notified.len()
    );
}

/// 1 件のテキストメッセージを解釈して各ユースケースに振り分ける
///
/// 解釈できないメッセージは破棄し、接続は維持する。
async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropping malformed message from '{}': {}", connection_id, e);
            return;
        }
    };

    // Convert DTO -> Domain Event
    let event = match InboundEvent::try_from(message) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropping invalid message from '{}': {}", connection_id, e);
            return;
        }
    };

    dispatch(state, connection_id, event).await;
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: InboundEvent) {
    match event {
        InboundEvent::Join {
            kind,
            room,
            display_name,
        } => {
            if let Err(e) = state
                .join_room_usecase
                .execute(connection_id, kind, room, display_name)
                .await
            {
                tracing::warn!("Join failed for '{}': {}", connection_id, e);
            }
        }
        InboundEvent::VoiceReady { room } => {
            state
                .mark_voice_ready_usecase
                .execute(&room, connection_id)
                .await;
        }
        InboundEvent::Signal {
            kind,
            room: _,
            to,
            payload,
        } => {
            state
                .relay_signal_usecase
                .execute(kind, connection_id, &to, payload)
                .await;
        }
        InboundEvent::Room { room, event } => {
            let kind = event.kind();
            let targets = state
                .broadcast_room_event_usecase
                .execute(room, connection_id, event)
                .await;
            tracing::debug!(
                "Relayed {} from '{}' to {} member(s)",
                kind,
                connection_id,
                targets.len()
            );
        }
    }
}
