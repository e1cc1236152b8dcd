//! UseCase: 接続の登録
//!
//! トランスポート接続ごとに接続 ID を払い出し、Connection Registry と
//! MessagePusher に登録します。登録直後の接続は未参加（Unjoined）状態です。

use std::sync::Arc;

use twincanvas_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionIdFactory, ConnectionRepository, MessagePusher,
    PusherChannel, ServerEvent, Timestamp,
};

/// 接続登録のユースケース
pub struct RegisterConnectionUseCase {
    connection_repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RegisterConnectionUseCase {
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connection_repository,
            message_pusher,
            clock,
        }
    }

    /// 接続を登録し、払い出した接続 ID を返す
    ///
    /// 本人には `connected` イベントで接続 ID を通知する。
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionIdFactory::generate();
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.connection_repository
            .register(Connection::new(connection_id.clone(), connected_at))
            .await;
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let greeting = ServerEvent::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &greeting).await {
            tracing::warn!("Failed to greet connection '{}': {}", connection_id, e);
        }

        connection_id
    }
}
