//! Room, presence and WebRTC signaling relay for TwinCanvas.
//!
//! Clients connect over a single WebSocket, join a named room, and the server
//! relays drawing / playback events and peer-to-peer signaling between them.
//! Media never passes through the server.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
