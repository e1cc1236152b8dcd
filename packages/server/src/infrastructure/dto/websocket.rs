//! WebSocket message DTOs.
//!
//! Every frame is a JSON object discriminated by its `type` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::RoomKind;

/// Message received from a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        #[serde(default)]
        kind: RoomKind,
        room: String,
        #[serde(alias = "userName")]
        display_name: String,
    },
    VoiceReady {
        room: String,
    },
    SessionOffer {
        room: String,
        to: String,
        payload: Value,
    },
    SessionAnswer {
        room: String,
        to: String,
        payload: Value,
    },
    IceCandidate {
        room: String,
        to: String,
        payload: Value,
    },
    Draw {
        room: String,
        #[serde(flatten)]
        stroke: Map<String, Value>,
    },
    Clear {
        room: String,
    },
    Undo {
        room: String,
        state: String,
    },
    PlaybackPlay {
        room: String,
    },
    PlaybackPause {
        room: String,
    },
    PlaybackSeek {
        room: String,
        time: f64,
    },
    PlaybackDuration {
        room: String,
        duration: f64,
    },
    PlaybackTimeUpdate {
        room: String,
        time: f64,
    },
}

/// Message sent to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: String },
    PresenceUpdate { names: Vec<String> },
    #[serde(rename_all = "camelCase")]
    VoicePeersSnapshot { connection_ids: Vec<String> },
    #[serde(rename_all = "camelCase")]
    VoicePeerJoined { connection_id: String },
    #[serde(rename_all = "camelCase")]
    VoicePeerLeft { connection_id: String },
    SessionOffer { from: String, payload: Value },
    SessionAnswer { from: String, payload: Value },
    IceCandidate { from: String, payload: Value },
    Draw {
        room: String,
        #[serde(flatten)]
        stroke: Map<String, Value>,
    },
    Clear,
    Undo { state: String },
    PlaybackPlay,
    PlaybackPause,
    PlaybackSeek { time: f64 },
    PlaybackDuration { duration: f64 },
    PlaybackTimeUpdate { time: f64 },
    JoinRejected { room: String, reason: String },
}
