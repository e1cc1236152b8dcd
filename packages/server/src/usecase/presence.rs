//! UseCase: 在室情報の通知（Presence Broadcaster）
//!
//! メンバーシップや音声準備状態が変わるたびに、ルームの現在のメンバーへ
//! 状態を通知します。呼び出し側はメンバーシップロックを保持したまま呼ぶこと。
//!
//! - 参加時: 参加者本人に参加前の音声準備完了メンバー一覧、全員に表示名一覧
//! - 音声準備時: 本人以外に `voice-peer-joined`
//! - 退出時: 残りの全員に `voice-peer-left` と表示名一覧

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, MessagePusher, RoomId, RoomRepository, ServerEvent};

use super::BroadcastRoomEventUseCase;

/// 在室情報の通知
pub struct PresenceBroadcaster {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    room_broadcast: Arc<BroadcastRoomEventUseCase>,
}

impl PresenceBroadcaster {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        room_broadcast: Arc<BroadcastRoomEventUseCase>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
            room_broadcast,
        }
    }

    /// 参加順の表示名一覧
    pub async fn display_names(&self, room: &RoomId) -> Vec<DisplayName> {
        self.room_repository
            .members(room)
            .await
            .into_iter()
            .map(|m| m.display_name)
            .collect()
    }

    /// 参加の通知
    ///
    /// # Arguments
    ///
    /// * `voice_peers` - 参加直前の時点で音声準備完了だったメンバー
    pub async fn announce_join(
        &self,
        room: &RoomId,
        joiner: &ConnectionId,
        voice_peers: Vec<ConnectionId>,
    ) -> Vec<ConnectionId> {
        let snapshot = ServerEvent::VoicePeersSnapshot {
            connection_ids: voice_peers,
        };
        if let Err(e) = self.message_pusher.push_to(joiner, &snapshot).await {
            tracing::warn!("Failed to send voice peers to '{}': {}", joiner, e);
        }

        self.broadcast_presence(room).await
    }

    /// 音声準備完了の通知（本人以外へ）
    pub async fn announce_voice_ready(
        &self,
        room: &RoomId,
        connection_id: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let event = ServerEvent::VoicePeerJoined {
            connection_id: connection_id.clone(),
        };
        self.room_broadcast
            .broadcast_to_others(room, connection_id, &event)
            .await
    }

    /// 退出の通知（残りのメンバーへ）
    ///
    /// 退出者が音声準備完了だったかどうかに関係なく `voice-peer-left` を送る。
    pub async fn announce_leave(
        &self,
        room: &RoomId,
        departed: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let left = ServerEvent::VoicePeerLeft {
            connection_id: departed.clone(),
        };
        self.room_broadcast.broadcast_to_all(room, &left).await;

        self.broadcast_presence(room).await
    }

    async fn broadcast_presence(&self, room: &RoomId) -> Vec<ConnectionId> {
        let names = self.display_names(room).await;
        tracing::debug!("Presence of room '{}': {} member(s)", room, names.len());
        self.room_broadcast
            .broadcast_to_all(room, &ServerEvent::PresenceUpdate { names })
            .await
    }
}
