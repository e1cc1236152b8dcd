//! UseCase テスト用のフィクスチャ
//!
//! インメモリ実装と実際の WebSocketMessagePusher で依存関係を組み立て、
//! 各接続の送信チャンネルに届いたメッセージを DTO として取り出せるようにする。

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use twincanvas_shared::time::FixedClock;

use crate::{
    domain::{ConnectionId, DisplayName, RoomId, RoomKind},
    infrastructure::{
        dto::websocket::ServerMessage,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
    },
};

use super::{
    BroadcastRoomEventUseCase, DisconnectParticipantUseCase, JoinRoomUseCase,
    MarkVoiceReadyUseCase, MembershipLock, PresenceBroadcaster, RegisterConnectionUseCase,
    RelaySignalUseCase,
};

pub const FIXED_TIME: i64 = 1672531200000;

pub struct TestContext {
    pub connections: Arc<InMemoryConnectionRepository>,
    pub rooms: Arc<InMemoryRoomRepository>,
    pub register: RegisterConnectionUseCase,
    pub join: JoinRoomUseCase,
    pub voice: MarkVoiceReadyUseCase,
    pub relay: RelaySignalUseCase,
    pub room_broadcast: Arc<BroadcastRoomEventUseCase>,
    pub presence: Arc<PresenceBroadcaster>,
    pub disconnect: DisconnectParticipantUseCase,
}

impl TestContext {
    pub fn new() -> Self {
        let connections = Arc::new(InMemoryConnectionRepository::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(FixedClock::new(FIXED_TIME));
        let lock: MembershipLock = Arc::new(Mutex::new(()));

        let room_broadcast = Arc::new(BroadcastRoomEventUseCase::new(
            rooms.clone(),
            pusher.clone(),
        ));
        let presence = Arc::new(PresenceBroadcaster::new(
            rooms.clone(),
            pusher.clone(),
            room_broadcast.clone(),
        ));

        Self {
            register: RegisterConnectionUseCase::new(
                connections.clone(),
                pusher.clone(),
                clock.clone(),
            ),
            join: JoinRoomUseCase::new(
                connections.clone(),
                rooms.clone(),
                pusher.clone(),
                presence.clone(),
                lock.clone(),
                clock,
            ),
            voice: MarkVoiceReadyUseCase::new(rooms.clone(), presence.clone(), lock.clone()),
            relay: RelaySignalUseCase::new(pusher.clone()),
            disconnect: DisconnectParticipantUseCase::new(
                connections.clone(),
                rooms.clone(),
                pusher,
                presence.clone(),
                lock,
            ),
            room_broadcast,
            presence,
            connections,
            rooms,
        }
    }

    /// 接続を登録し、`connected` メッセージを読み捨てた受信チャンネルを返す
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection_id = self.register.execute(tx).await;
        let greeting = drain(&mut rx);
        assert_eq!(greeting.len(), 1, "expected a single connected message");
        (connection_id, rx)
    }

    /// ルームに参加させる（成功前提）
    pub async fn join_room(&self, connection_id: &ConnectionId, room: &str, name: &str) {
        self.join
            .execute(
                connection_id,
                RoomKind::Draw,
                room_id(room),
                DisplayName::new(name.to_string()),
            )
            .await
            .expect("join should succeed");
    }
}

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

/// チャンネルに溜まっているメッセージをすべて取り出す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).expect("server message should be valid JSON"));
    }
    messages
}

pub fn presence_update(names: &[&str]) -> ServerMessage {
    ServerMessage::PresenceUpdate {
        names: names.iter().map(|n| n.to_string()).collect(),
    }
}
