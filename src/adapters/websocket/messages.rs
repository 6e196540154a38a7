//! WebSocket message types for the live operations feed.
//!
//! Server → client traffic is either a control message defined here or a
//! [`TelemetryEvent`](crate::domain::telemetry::TelemetryEvent) forwarded
//! verbatim. Both are JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::domain::run::SessionStats;
use crate::domain::tools::ToolsBySection;
use crate::ports::RuntimeInfo;

// ============================================
// Server → Client Messages
// ============================================

/// Control messages sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established.
    Connected(ConnectedMessage),

    /// Error handling a client message.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Initial snapshot for a new subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedMessage {
    pub client_id: String,
    pub stats: SessionStats,
    pub tools: ToolsBySection,
    pub runtime: RuntimeInfo,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    /// Submit a query; the outcome arrives as telemetry.
    Query { query: String },

    /// Clear conversation history and statistics.
    ClearConversation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_by_type() {
        let ping: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(ping, ClientMessage::Ping));

        let query: ClientMessage =
            serde_json::from_str(r#"{"type": "query", "query": "readiness of 2/5"}"#).unwrap();
        assert!(matches!(query, ClientMessage::Query { query } if query == "readiness of 2/5"));

        let clear: ClientMessage =
            serde_json::from_str(r#"{"type": "clear_conversation"}"#).unwrap();
        assert!(matches!(clear, ClientMessage::ClearConversation));
    }

    #[test]
    fn unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "shutdown"}"#).is_err());
    }

    #[test]
    fn pong_is_tagged() {
        let msg = ServerMessage::Pong(PongMessage {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "pong");
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00Z");
    }
}
