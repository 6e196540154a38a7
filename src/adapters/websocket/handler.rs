//! WebSocket upgrade handler for the live operations feed.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Subscribe to the telemetry broadcast
//! 3. Send the `connected` snapshot
//! 4. Forward telemetry and answer client messages until disconnect

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::adapters::http::dashboard::DashboardAppState;
use crate::application::{ClearHistoryCommand, DispatchCommand};
use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::TelemetryEvent;

use super::messages::{ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage};

/// Replies queued for the send task.
const REPLY_BUFFER: usize = 16;

/// Route: `GET /ws/live`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<DashboardAppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Creates the live feed router.
pub fn websocket_router(state: DashboardAppState) -> Router {
    Router::new()
        .route("/ws/live", get(ws_handler))
        .with_state(state)
}

fn now() -> String {
    Timestamp::now().as_datetime().to_rfc3339()
}

async fn handle_socket(socket: WebSocket, state: DashboardAppState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = Uuid::new_v4().to_string();

    // Subscribe before the snapshot so nothing published in between is lost
    let mut events: broadcast::Receiver<TelemetryEvent> = state.telemetry.subscribe();

    let connected = ServerMessage::Connected(ConnectedMessage {
        client_id: client_id.clone(),
        stats: state.services.stats.snapshot(),
        tools: state.services.assistant.tools().tools_info(),
        runtime: state.services.assistant.runtime_info(),
        timestamp: now(),
    });
    if let Err(e) = send_json(&mut sender, &connected).await {
        tracing::debug!(%client_id, "Failed to send connected message: {}", e);
        return;
    }
    tracing::info!(%client_id, "Live feed client connected");

    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(REPLY_BUFFER);

    let mut send_task = {
        let client_id = client_id.clone();
        tokio::spawn(async move {
            loop {
                let result = tokio::select! {
                    event = events.recv() => match event {
                        Ok(event) => send_json(&mut sender, &event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(%client_id, skipped, "Live feed lagged, events dropped");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    reply = reply_rx.recv() => match reply {
                        Some(reply) => send_json(&mut sender, &reply).await,
                        None => break,
                    },
                };
                if let Err(e) = result {
                    tracing::debug!(%client_id, "Send error, closing connection: {}", e);
                    break;
                }
            }
        })
    };

    let mut recv_task = {
        let client_id = client_id.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => handle_client_message(msg, &state, &client_id),
                            Err(e) => Some(ServerMessage::Error(ErrorMessage {
                                code: "BAD_MESSAGE".to_string(),
                                message: e.to_string(),
                                timestamp: now(),
                            })),
                        };
                        if let Some(reply) = reply {
                            if reply_tx.send(reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(%client_id, "Received unsupported binary message");
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(%client_id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%client_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(%client_id, "Live feed client disconnected");
}

/// Acts on a client message; returns a direct reply when there is one.
fn handle_client_message(
    msg: ClientMessage,
    state: &DashboardAppState,
    client_id: &str,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Ping => {
            tracing::trace!(%client_id, "Received ping");
            Some(ServerMessage::Pong(PongMessage { timestamp: now() }))
        }
        ClientMessage::Query { query } => {
            if query.trim().is_empty() {
                return Some(ServerMessage::Error(ErrorMessage {
                    code: "BAD_REQUEST".to_string(),
                    message: "query cannot be empty".to_string(),
                    timestamp: now(),
                }));
            }
            tracing::debug!(%client_id, "Query received over live feed");
            let dispatcher = state.services.dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.handle(DispatchCommand::Query(query)).await;
            });
            None
        }
        ClientMessage::ClearConversation => {
            state.services.clear_history.handle(ClearHistoryCommand);
            None
        }
    }
}

async fn send_json<T: Serialize>(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &T,
) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!("Failed to serialize live feed message: {}", e);
            Ok(())
        }
    }
}
