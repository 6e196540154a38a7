//! WebSocket live feed.
//!
//! Each connected client gets its own subscription to the telemetry
//! broadcast and sees every tool and query event as it is published.
//!
//! ```text
//! tool monitor / handlers ──publish──▶ BroadcastSink ──subscribe──▶ client 1
//!                                                    └─subscribe──▶ client 2
//! ```
//!
//! - [`messages`] - control message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;

pub use handler::{websocket_router, ws_handler};
pub use messages::{ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage};
