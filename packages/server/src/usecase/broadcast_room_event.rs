//! UseCase: ルーム内ブロードキャスト（Room Broadcast Router）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 描画・再生イベントが送信者以外のメンバーにだけ届くこと
//! - `broadcast_to_all` が送信者を含む全メンバーに届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーのルームでのファンアウト
//! - エッジケース：送信者しかいないルーム、存在しないルーム、切断済みの宛先
//!
//! 配信はベストエフォートで、1 件の失敗が残りの宛先への配信を止めることはない。
//! 再生系イベント（play / pause / seek / duration / time-update）も送信者を除外する。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomEvent, RoomId, RoomRepository, ServerEvent};

/// ルーム内ブロードキャストのユースケース
pub struct BroadcastRoomEventUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastRoomEventUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
        }
    }

    /// クライアントから届いたルームイベントを、送信者以外のメンバーに配信
    ///
    /// # Returns
    ///
    /// 配信対象の接続 ID リスト
    pub async fn execute(
        &self,
        room: RoomId,
        sender: &ConnectionId,
        event: RoomEvent,
    ) -> Vec<ConnectionId> {
        let event = ServerEvent::Room {
            room: room.clone(),
            event,
        };
        self.broadcast_to_others(&room, sender, &event).await
    }

    /// 送信者以外の全メンバーに配信
    pub async fn broadcast_to_others(
        &self,
        room: &RoomId,
        sender: &ConnectionId,
        event: &ServerEvent,
    ) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> = self
            .room_repository
            .members(room)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .filter(|id| id != sender)
            .collect();
        self.fan_out(room, targets, event).await
    }

    /// 送信者を含む全メンバーに配信
    pub async fn broadcast_to_all(&self, room: &RoomId, event: &ServerEvent) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> = self
            .room_repository
            .members(room)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .collect();
        self.fan_out(room, targets, event).await
    }

    async fn fan_out(
        &self,
        room: &RoomId,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Vec<ConnectionId> {
        if targets.is_empty() {
            tracing::debug!("No recipients for '{}' in room '{}'", event.kind(), room);
            return targets;
        }
        if let Err(e) = self.message_pusher.broadcast(&targets, event).await {
            tracing::warn!(
                "Failed to broadcast '{}' to room '{}': {}",
                event.kind(),
                room,
                e
            );
        }
        targets
    }
}
