//! UseCase 層
//!
//! 1 つの操作グループにつき 1 つのユースケースを提供します。
//!
//! - 接続の登録・切断: `RegisterConnectionUseCase`, `DisconnectParticipantUseCase`
//! - ルームへの参加・音声準備: `JoinRoomUseCase`, `MarkVoiceReadyUseCase`
//! - 中継: `RelaySignalUseCase`（1 対 1）, `BroadcastRoomEventUseCase`（ルーム内ファンアウト）
//! - 在室情報の通知: `PresenceBroadcaster`
//! - ルームの参照: `GetRoomsUseCase`, `GetRoomDetailUseCase`

use std::sync::Arc;

use tokio::sync::Mutex;

mod broadcast_room_event;
mod disconnect_participant;
mod error;
mod get_rooms;
mod join_room;
mod mark_voice_ready;
mod presence;
mod register_connection;
mod relay_signal;

#[cfg(test)]
mod test_support;

pub use broadcast_room_event::BroadcastRoomEventUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetRoomDetailError, JoinError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use mark_voice_ready::MarkVoiceReadyUseCase;
pub use presence::PresenceBroadcaster;
pub use register_connection::RegisterConnectionUseCase;
pub use relay_signal::RelaySignalUseCase;

/// メンバーシップ変更の直列化ロック
///
/// 参加・音声準備・退出と、それに伴う在室通知はこのロックを保持したまま行う。
/// これにより、同じルームの通知がメンバーシップ変更の順序と入れ替わることはない。
pub type MembershipLock = Arc<Mutex<()>>;
