//! UseCase: シグナリング中継（Signaling Router）
//!
//! offer / answer / ICE candidate を、送信者が指定した 1 つの接続にだけ転送します。
//! ペイロードは解釈も保存もしません。音声・動画・画面共有のすべてがこの経路を使います。
//!
//! 宛先が同じルームにいるかは検証しません（クライアントを信頼する前提）。
//! 宛先が既に切断していた場合は黙って破棄します。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, ServerEvent, SignalKind};

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 中継を実行
    ///
    /// # Returns
    ///
    /// 宛先の送信チャンネルに渡せた場合 `true`
    pub async fn execute(
        &self,
        kind: SignalKind,
        from: &ConnectionId,
        to: &ConnectionId,
        payload: Value,
    ) -> bool {
        let event = ServerEvent::Signal {
            kind,
            from: from.clone(),
            payload,
        };

        match self.message_pusher.push_to(to, &event).await {
            Ok(()) => true,
            Err(MessagePushError::ClientNotFound(_)) => {
                tracing::debug!(
                    "Dropping {} from '{}': recipient '{}' is gone",
                    kind.as_str(),
                    from,
                    to
                );
                false
            }
            Err(e) => {
                tracing::warn!("Failed to relay {} from '{}' to '{}': {}", kind.as_str(), from, to, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockMessagePusher,
        infrastructure::dto::websocket::ServerMessage,
        usecase::test_support::{TestContext, drain},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_relay_reaches_recipient_only() {
        // テスト項目: offer は宛先の接続にだけ届き、ルームには配信されない
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, mut alice_rx) = ctx.connect().await;
        let (bob, mut bob_rx) = ctx.connect().await;
        let (carol, mut carol_rx) = ctx.connect().await;
        ctx.join_room(&alice, "r1", "Alice").await;
        ctx.join_room(&bob, "r1", "Bob").await;
        ctx.join_room(&carol, "r1", "Carol").await;
        for rx in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
            drain(rx);
        }

        // when (操作):
        let delivered = ctx
            .relay
            .execute(
                SignalKind::SessionOffer,
                &alice,
                &bob,
                json!({"type": "offer", "sdp": "v=0"}),
            )
            .await;

        // then (期待する結果):
        assert!(delivered);
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerMessage::SessionOffer {
                from: alice.as_str().to_string(),
                payload: json!({"type": "offer", "sdp": "v=0"}),
            }]
        );
        assert!(drain(&mut alice_rx).is_empty());
        assert!(drain(&mut carol_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_does_not_require_shared_room() {
        // テスト項目: 宛先が未参加でも接続していれば届く（ルームは検証しない）
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _alice_rx) = ctx.connect().await;
        let (bob, mut bob_rx) = ctx.connect().await;
        ctx.join_room(&alice, "r1", "Alice").await;

        // when (操作):
        let delivered = ctx
            .relay
            .execute(SignalKind::IceCandidate, &alice, &bob, json!("candidate:1"))
            .await;

        // then (期待する結果):
        assert!(delivered);
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerMessage::IceCandidate {
                from: alice.as_str().to_string(),
                payload: json!("candidate:1"),
            }]
        );
    }

    #[tokio::test]
    async fn test_relay_to_vanished_peer_is_dropped() {
        // テスト項目: 切断済みの宛先への中継はエラーにならず破棄される
        // given (前提条件):
        let from = ConnectionId::new("alice".to_string()).unwrap();
        let to = ConnectionId::new("gone".to_string()).unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .with(eq(to.clone()), mockall::predicate::always())
            .times(1)
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.to_string())));
        let usecase = RelaySignalUseCase::new(Arc::new(pusher));

        // when (操作):
        let delivered = usecase
            .execute(SignalKind::SessionAnswer, &from, &to, json!({}))
            .await;

        // then (期待する結果):
        assert!(!delivered);
    }

    #[tokio::test]
    async fn test_relay_passes_kind_and_sender_through() {
        // テスト項目: 種別と送信者がそのまま宛先へのイベントに入る
        // given (前提条件):
        let from = ConnectionId::new("alice".to_string()).unwrap();
        let to = ConnectionId::new("bob".to_string()).unwrap();
        let expected = ServerEvent::Signal {
            kind: SignalKind::SessionAnswer,
            from: from.clone(),
            payload: json!({"sdp": "answer"}),
        };
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .withf(move |id, event| id.as_str() == "bob" && event == &expected)
            .times(1)
            .returning(|_, _| Ok(()));
        pusher.expect_broadcast().never();
        let usecase = RelaySignalUseCase::new(Arc::new(pusher));

        // when (操作):
        let delivered = usecase
            .execute(SignalKind::SessionAnswer, &from, &to, json!({"sdp": "answer"}))
            .await;

        // then (期待する結果):
        assert!(delivered);
    }
}
