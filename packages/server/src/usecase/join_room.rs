//! UseCase: ルームへの参加（Session Lifecycle: Unjoined → Joined）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの暗黙的な作成、参加前の音声準備完了メンバーの通知、表示名一覧の配信
//!
//! ### なぜこのテストが必要か
//! - 参加者は voice-peers-snapshot をもとに既存メンバーへ通話を開始する
//! - 二重参加でメンバーが重複登録されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：同じルームへの二重参加、別ルームへの参加、切断済み接続からの参加
//! - 中断：参加処理の途中でタスクが abort されても、切断後にメンバーが残らない

use std::sync::Arc;

use twincanvas_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, DisplayName, JoinRejection, Member, MessagePusher,
    RepositoryError, RoomId, RoomKind, RoomRepository, ServerEvent, Timestamp,
};

use super::{JoinError, MembershipLock, PresenceBroadcaster};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    connection_repository: Arc<dyn ConnectionRepository>,
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceBroadcaster>,
    membership_lock: MembershipLock,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceBroadcaster>,
        membership_lock: MembershipLock,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connection_repository,
            room_repository,
            message_pusher,
            presence,
            membership_lock,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Member)` - 追加されたメンバー
    /// * `Err(JoinError::Rejected)` - 二重参加。本人に `join-rejected` を通知済み
    /// * `Err(JoinError::NotConnected)` - 接続が登録されていない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        kind: RoomKind,
        room: RoomId,
        display_name: DisplayName,
    ) -> Result<Member, JoinError> {
        let _guard = self.membership_lock.lock().await;

        // 1. 接続の状態を確認（1 接続につき参加は 1 回のみ）
        let connection = self
            .connection_repository
            .get(connection_id)
            .await
            .ok_or_else(|| JoinError::NotConnected(connection_id.to_string()))?;
        if let Some(current) = connection.current_room() {
            let reason = if current == &room {
                JoinRejection::AlreadyMember
            } else {
                JoinRejection::AlreadyJoined
            };
            return Err(self.reject(connection_id, room, reason).await);
        }

        // 2. 参加前の音声準備完了メンバーを取得
        let voice_peers = self.room_repository.voice_ready_member_ids(&room).await;

        // 3. Connection Registry にセッションを設定
        //    Room Directory より先に設定する（Directory にだけメンバーが残る中断点を作らない）
        self.connection_repository
            .set_session(connection_id, room.clone(), display_name.clone())
            .await?;

        // 4. Room Directory に追加（ルームが無ければ作成）
        let member = Member::new(
            connection_id.clone(),
            display_name,
            Timestamp::new(self.clock.now_millis()),
        );
        let member = match self.room_repository.join(&room, kind, member).await {
            Ok(member) => member,
            Err(e) => {
                self.connection_repository.clear_session(connection_id).await;
                return Err(match e {
                    RepositoryError::DuplicateMember { .. } => {
                        self.reject(connection_id, room, JoinRejection::AlreadyMember)
                            .await
                    }
                    other => other.into(),
                });
            }
        };

        tracing::info!(
            "'{}' ({}) joined room '{}'",
            member.display_name.as_str(),
            connection_id,
            room
        );

        // 5. 在室情報を通知
        self.presence
            .announce_join(&room, connection_id, voice_peers)
            .await;

        Ok(member)
    }

    async fn reject(
        &self,
        connection_id: &ConnectionId,
        room: RoomId,
        reason: JoinRejection,
    ) -> JoinError {
        tracing::warn!(
            "Rejected join of '{}' to room '{}': {}",
            connection_id,
            room,
            reason.as_str()
        );
        let event = ServerEvent::JoinRejected {
            room: room.clone(),
            reason,
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &event).await {
            tracing::warn!("Failed to send join-rejected to '{}': {}", connection_id, e);
        }
        JoinError::Rejected {
            room: room.into_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::{Mutex, mpsc};
    use twincanvas_shared::time::FixedClock;

    use crate::{
        domain::{Connection, Room},
        infrastructure::{
            dto::websocket::ServerMessage,
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
        },
        usecase::{
            BroadcastRoomEventUseCase, DisconnectParticipantUseCase,
            test_support::{FIXED_TIME, TestContext, drain, presence_update, room_id},
        },
    };

    /// 書き込みの直後に一度だけ他のタスクへ実行を譲る Connection Registry
    struct YieldingConnectionRepository(InMemoryConnectionRepository);

    #[async_trait]
    impl ConnectionRepository for YieldingConnectionRepository {
        async fn register(&self, connection: Connection) {
            self.0.register(connection).await
        }

        async fn set_session(
            &self,
            connection_id: &ConnectionId,
            room: RoomId,
            display_name: DisplayName,
        ) -> Result<(), RepositoryError> {
            let result = self.0.set_session(connection_id, room, display_name).await;
            tokio::task::yield_now().await;
            result
        }

        async fn clear_session(&self, connection_id: &ConnectionId) {
            self.0.clear_session(connection_id).await
        }

        async fn lookup_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
            self.0.lookup_room(connection_id).await
        }

        async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
            self.0.get(connection_id).await
        }

        async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
            self.0.remove(connection_id).await
        }
    }

    /// 書き込みの前後で他のタスクへ実行を譲る Room Directory
    struct YieldingRoomRepository(InMemoryRoomRepository);

    #[async_trait]
    impl RoomRepository for YieldingRoomRepository {
        async fn join(
            &self,
            room_id: &RoomId,
            kind: RoomKind,
            member: Member,
        ) -> Result<Member, RepositoryError> {
            tokio::task::yield_now().await;
            let result = self.0.join(room_id, kind, member).await;
            tokio::task::yield_now().await;
            result
        }

        async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
            self.0.leave(room_id, connection_id).await
        }

        async fn members(&self, room_id: &RoomId) -> Vec<Member> {
            self.0.members(room_id).await
        }

        async fn set_voice_ready(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
            self.0.set_voice_ready(room_id, connection_id).await
        }

        async fn voice_ready_member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
            self.0.voice_ready_member_ids(room_id).await
        }

        async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
            self.0.get_room(room_id).await
        }

        async fn list_rooms(&self) -> Vec<Room> {
            self.0.list_rooms().await
        }
    }

    #[tokio::test]
    async fn test_join_creates_room_and_broadcasts_presence() {
        // テスト項目: 最初の参加でルームが作成され、本人に空の音声一覧と表示名一覧が届く
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;

        // when (操作):
        let member = ctx
            .join
            .execute(
                &alice,
                RoomKind::Screen,
                room_id("r1"),
                DisplayName::new("Alice".to_string()),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(member.connection_id, alice);
        assert!(!member.voice_ready);
        assert_eq!(ctx.rooms.get_room(&room_id("r1")).await.unwrap().kind, RoomKind::Screen);
        assert_eq!(ctx.connections.lookup_room(&alice).await, Some(room_id("r1")));
        assert_eq!(
            drain(&mut alice_rx),
            vec![
                ServerMessage::VoicePeersSnapshot {
                    connection_ids: vec![],
                },
                presence_update(&["Alice"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_join_presence_reaches_every_member_once() {
        // テスト項目: 参加のたびに、そのルームの全メンバーに表示名一覧が 1 回ずつ届く
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;
        let (bob, mut bob_rx) = ctx.connect().await;
        let (outsider, mut outsider_rx) = ctx.connect().await;
        ctx.join_room(&outsider, "elsewhere", "Olga").await;
        ctx.join_room(&alice, "r1", "Alice").await;
        drain(&mut alice_rx);
        drain(&mut outsider_rx);

        // when (操作):
        ctx.join_room(&bob, "r1", "Bob").await;

        // then (期待する結果):
        assert_eq!(drain(&mut alice_rx), vec![presence_update(&["Alice", "Bob"])]);
        assert_eq!(
            drain(&mut bob_rx),
            vec![
                ServerMessage::VoicePeersSnapshot {
                    connection_ids: vec![],
                },
                presence_update(&["Alice", "Bob"]),
            ]
        );
        assert!(drain(&mut outsider_rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_sends_pre_join_voice_snapshot() {
        // テスト項目: 参加者には参加前に音声準備完了だったメンバーだけが通知される
        // given (前提条件): A は音声準備完了、B は未完了
        let ctx = TestContext::new();
        let (a, _a_rx) = ctx.connect().await;
        let (b, _b_rx) = ctx.connect().await;
        let (c, mut c_rx) = ctx.connect().await;
        ctx.join_room(&a, "r1", "A").await;
        ctx.join_room(&b, "r1", "B").await;
        assert!(ctx.voice.execute(&room_id("r1"), &a).await);

        // when (操作):
        ctx.join_room(&c, "r1", "C").await;

        // then (期待する結果):
        let messages = drain(&mut c_rx);
        assert_eq!(
            messages[0],
            ServerMessage::VoicePeersSnapshot {
                connection_ids: vec![a.as_str().to_string()],
            }
        );
        assert_eq!(messages[1], presence_update(&["A", "B", "C"]));
    }

    #[tokio::test]
    async fn test_join_same_room_twice_is_rejected() {
        // テスト項目: 同じルームへの二重参加は拒否され、状態も通知も変わらない
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;
        let (bob, mut bob_rx) = ctx.connect().await;
        ctx.join_room(&alice, "r1", "Alice").await;
        ctx.join_room(&bob, "r1", "Bob").await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        let result = ctx
            .join
            .execute(
                &alice,
                RoomKind::Draw,
                room_id("r1"),
                DisplayName::new("Alice".to_string()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinError::Rejected {
                room: "r1".to_string(),
                reason: JoinRejection::AlreadyMember,
            })
        );
        assert_eq!(ctx.rooms.members(&room_id("r1")).await.len(), 2);
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::JoinRejected {
                room: "r1".to_string(),
                reason: "already-member".to_string(),
            }]
        );
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_another_room_is_rejected() {
        // テスト項目: 参加済みの接続が別のルームに参加しようとすると拒否される
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;
        ctx.join_room(&alice, "r1", "Alice").await;
        drain(&mut alice_rx);

        // when (操作):
        let result = ctx
            .join
            .execute(
                &alice,
                RoomKind::Draw,
                room_id("r2"),
                DisplayName::new("Alice".to_string()),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(JoinError::Rejected {
                reason: JoinRejection::AlreadyJoined,
                ..
            })
        ));
        assert!(ctx.rooms.get_room(&room_id("r2")).await.is_none());
        assert_eq!(ctx.connections.lookup_room(&alice).await, Some(room_id("r1")));
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::JoinRejected {
                room: "r2".to_string(),
                reason: "already-joined".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_join_from_unknown_connection() {
        // テスト項目: 登録されていない接続からの参加はエラーになり、ルームは作られない
        // given (前提条件):
        let ctx = TestContext::new();
        let ghost = ConnectionId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = ctx
            .join
            .execute(
                &ghost,
                RoomKind::Draw,
                room_id("r1"),
                DisplayName::new("Ghost".to_string()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::NotConnected("ghost".to_string())));
        assert!(ctx.rooms.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_aborted_join_leaves_no_member_after_disconnect() {
        // テスト項目: 参加処理がどの待機点で abort されても、切断後にルームは残らない
        for yields_before_abort in 0..8 {
            // given (前提条件):
            let connections = Arc::new(YieldingConnectionRepository(
                InMemoryConnectionRepository::new(),
            ));
            let rooms = Arc::new(YieldingRoomRepository(InMemoryRoomRepository::new()));
            let pusher = Arc::new(WebSocketMessagePusher::new());
            let lock: MembershipLock = Arc::new(Mutex::new(()));
            let room_broadcast = Arc::new(BroadcastRoomEventUseCase::new(
                rooms.clone(),
                pusher.clone(),
            ));
            let presence = Arc::new(PresenceBroadcaster::new(
                rooms.clone(),
                pusher.clone(),
                room_broadcast,
            ));
            let join = Arc::new(JoinRoomUseCase::new(
                connections.clone(),
                rooms.clone(),
                pusher.clone(),
                presence.clone(),
                lock.clone(),
                Arc::new(FixedClock::new(FIXED_TIME)),
            ));
            let disconnect = DisconnectParticipantUseCase::new(
                connections.clone(),
                rooms.clone(),
                pusher.clone(),
                presence,
                lock,
            );

            let c1 = ConnectionId::new("c1".to_string()).unwrap();
            connections
                .register(Connection::new(c1.clone(), Timestamp::new(FIXED_TIME)))
                .await;
            let (tx, _rx) = mpsc::unbounded_channel();
            pusher.register_client(c1.clone(), tx).await;

            // when (操作): 参加処理の途中で abort してから切断
            let task = {
                let join = join.clone();
                let c1 = c1.clone();
                tokio::spawn(async move {
                    let _ = join
                        .execute(
                            &c1,
                            RoomKind::Draw,
                            room_id("r1"),
                            DisplayName::new("Alice".to_string()),
                        )
                        .await;
                })
            };
            for _ in 0..yields_before_abort {
                tokio::task::yield_now().await;
            }
            task.abort();
            let _ = task.await;
            disconnect.execute(&c1).await;

            // then (期待する結果):
            assert!(
                rooms.get_room(&room_id("r1")).await.is_none(),
                "room r1 still holds a member after abort at yield {}",
                yields_before_abort
            );
            assert!(connections.get(&c1).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_failed_directory_join_rolls_back_session() {
        // テスト項目: Directory 側で重複と判定された参加は、Registry のセッションを取り消す
        // given (前提条件): Registry は未参加だが Directory には既にメンバーがいる
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;
        ctx.rooms
            .join(
                &room_id("r1"),
                RoomKind::Draw,
                Member::new(
                    alice.clone(),
                    DisplayName::new("Alice".to_string()),
                    Timestamp::new(FIXED_TIME),
                ),
            )
            .await
            .unwrap();

        // when (操作):
        let result = ctx
            .join
            .execute(
                &alice,
                RoomKind::Draw,
                room_id("r1"),
                DisplayName::new("Alice".to_string()),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(JoinError::Rejected {
                reason: JoinRejection::AlreadyMember,
                ..
            })
        ));
        assert!(ctx.connections.lookup_room(&alice).await.is_none());
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::JoinRejected {
                room: "r1".to_string(),
                reason: "already-member".to_string(),
            }]
        );
    }
}
