//! ドメイン層
//!
//! 接続・ルーム・メンバーのモデルと、外部へのインターフェース（trait）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, Member, Room, Session, SessionState};
pub use error::{DomainError, MessagePushError, RepositoryError, RoomError};
pub use event::{InboundEvent, JoinRejection, RoomEvent, ServerEvent};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRepository, RoomRepository};
pub use value_object::{ConnectionId, DisplayName, RoomId, RoomKind, SignalKind, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
