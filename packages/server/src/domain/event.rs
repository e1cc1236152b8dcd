//! イベントモデル
//!
//! クライアントから届くイベント（`InboundEvent`）と、クライアントへ送るイベント
//! （`ServerEvent`）をワイヤ形式から切り離して表現します。

use serde_json::{Map, Value};

use super::{ConnectionId, DisplayName, RoomId, RoomKind, SignalKind};

/// ルーム内にファンアウトされるアプリケーションイベント
///
/// 中継処理はペイロードの中身を解釈しない。
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// 描画ストローク（座標・色・太さ・ツールなど、クライアントが送ったフィールドそのまま）
    Draw(Map<String, Value>),
    Clear,
    /// キャンバス全体のスナップショット（差分ではない）
    Undo { snapshot: String },
    PlaybackPlay,
    PlaybackPause,
    PlaybackSeek { time: f64 },
    PlaybackDuration { duration: f64 },
    PlaybackTimeUpdate { time: f64 },
}

impl RoomEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::Draw(_) => "draw",
            RoomEvent::Clear => "clear",
            RoomEvent::Undo { .. } => "undo",
            RoomEvent::PlaybackPlay => "playback-play",
            RoomEvent::PlaybackPause => "playback-pause",
            RoomEvent::PlaybackSeek { .. } => "playback-seek",
            RoomEvent::PlaybackDuration { .. } => "playback-duration",
            RoomEvent::PlaybackTimeUpdate { .. } => "playback-time-update",
        }
    }
}

/// 参加拒否の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
    /// 同じルームに既に参加している
    AlreadyMember,
    /// 別のルームに参加済み
    AlreadyJoined,
}

impl JoinRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRejection::AlreadyMember => "already-member",
            JoinRejection::AlreadyJoined => "already-joined",
        }
    }
}

/// クライアントから届いたイベント（検証済み）
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Join {
        kind: RoomKind,
        room: RoomId,
        display_name: DisplayName,
    },
    VoiceReady {
        room: RoomId,
    },
    Signal {
        kind: SignalKind,
        room: RoomId,
        to: ConnectionId,
        payload: Value,
    },
    Room {
        room: RoomId,
        event: RoomEvent,
    },
}

/// クライアントへ送るイベント
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// 接続直後に本人へ送る接続 ID
    Connected { connection_id: ConnectionId },
    /// 参加順の表示名一覧（差分ではなく全置換）
    PresenceUpdate { names: Vec<DisplayName> },
    /// 参加直前の時点で音声準備完了だったメンバー
    VoicePeersSnapshot { connection_ids: Vec<ConnectionId> },
    VoicePeerJoined { connection_id: ConnectionId },
    VoicePeerLeft { connection_id: ConnectionId },
    Signal {
        kind: SignalKind,
        from: ConnectionId,
        payload: Value,
    },
    Room { room: RoomId, event: RoomEvent },
    JoinRejected { room: RoomId, reason: JoinRejection },
}

impl ServerEvent {
    /// ログ出力用のイベント名
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::PresenceUpdate { .. } => "presence-update",
            ServerEvent::VoicePeersSnapshot { .. } => "voice-peers-snapshot",
            ServerEvent::VoicePeerJoined { .. } => "voice-peer-joined",
            ServerEvent::VoicePeerLeft { .. } => "voice-peer-left",
            ServerEvent::Signal { kind, .. } => kind.as_str(),
            ServerEvent::Room { event, .. } => event.kind(),
            ServerEvent::JoinRejected { .. } => "join-rejected",
        }
    }
}
