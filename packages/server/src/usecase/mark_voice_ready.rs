//! UseCase: 音声準備完了
//!
//! メンバーの音声準備完了フラグを立て、本人以外のメンバーに通知します。
//! 通知を受けた既存メンバーは新しいメンバーへ通話を開始します。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRepository};

use super::{MembershipLock, PresenceBroadcaster};

/// 音声準備完了のユースケース
pub struct MarkVoiceReadyUseCase {
    room_repository: Arc<dyn RoomRepository>,
    presence: Arc<PresenceBroadcaster>,
    membership_lock: MembershipLock,
}

impl MarkVoiceReadyUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        presence: Arc<PresenceBroadcaster>,
        membership_lock: MembershipLock,
    ) -> Self {
        Self {
            room_repository,
            presence,
            membership_lock,
        }
    }

    /// 音声準備完了を実行
    ///
    /// ルームは送信者の申告をそのまま使う。ルームまたはメンバーが存在しなければ
    /// 何も通知せず `false` を返す。既に準備完了のメンバーからの再通知は、
    /// 他のメンバーにもう一度 `voice-peer-joined` を送る。
    pub async fn execute(&self, room: &RoomId, connection_id: &ConnectionId) -> bool {
        let _guard = self.membership_lock.lock().await;

        if !self.room_repository.set_voice_ready(room, connection_id).await {
            tracing::debug!(
                "Ignoring voice-ready from '{}': not a member of room '{}'",
                connection_id,
                room
            );
            return false;
        }

        tracing::info!("'{}' is voice-ready in room '{}'", connection_id, room);
        self.presence
            .announce_voice_ready(room, connection_id)
            .await;
        true
    }
}
