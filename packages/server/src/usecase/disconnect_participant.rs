//! UseCase: 接続の切断（Session Lifecycle: → Terminated）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 退出処理（Room Directory からの削除、通知、Registry からの削除）
//!
//! ### なぜこのテストが必要か
//! - 残りのメンバーは voice-peer-left をもとにピア接続と音声要素を破棄する
//! - 最後のメンバーの切断でルームが削除されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加済みの接続の切断
//! - エッジケース：最後のメンバーの切断、未参加の接続の切断、2 回目の切断
//! - 並行：同じルームへの参加と切断が入り乱れても、通知がメンバーシップと食い違わない

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher, RoomRepository};

use super::{MembershipLock, PresenceBroadcaster};

/// 接続切断のユースケース
pub struct DisconnectParticipantUseCase {
    connection_repository: Arc<dyn ConnectionRepository>,
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceBroadcaster>,
    membership_lock: MembershipLock,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceBroadcaster>,
        membership_lock: MembershipLock,
    ) -> Self {
        Self {
            connection_repository,
            room_repository,
            message_pusher,
            presence,
            membership_lock,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 退出を通知した接続 ID リスト（未参加の接続や 2 回目の呼び出しでは空）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        let _guard = self.membership_lock.lock().await;

        // 1. 以後この接続には送信しない
        self.message_pusher.unregister_client(connection_id).await;

        // 2. 参加していたルームから退出し、残りのメンバーに通知
        let notified = match self.connection_repository.lookup_room(connection_id).await {
            Some(room) => match self.room_repository.leave(&room, connection_id).await {
                Some(member) => {
                    tracing::info!(
                        "'{}' ({}) left room '{}'",
                        member.display_name.as_str(),
                        connection_id,
                        room
                    );
                    self.presence.announce_leave(&room, connection_id).await
                }
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        // 3. Connection Registry から削除
        if self.connection_repository.remove(connection_id).await.is_some() {
            tracing::info!("Connection '{}' terminated", connection_id);
        }

        notified
    }
}
