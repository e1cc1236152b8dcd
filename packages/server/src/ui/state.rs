//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    BroadcastRoomEventUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinRoomUseCase, MarkVoiceReadyUseCase, RegisterConnectionUseCase,
    RelaySignalUseCase,
};

/// Shared application state
pub struct AppState {
    /// RegisterConnectionUseCase（接続登録のユースケース）
    pub register_connection_usecase: Arc<RegisterConnectionUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// MarkVoiceReadyUseCase（音声準備完了のユースケース）
    pub mark_voice_ready_usecase: Arc<MarkVoiceReadyUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// BroadcastRoomEventUseCase（ルーム内配信のユースケース）
    pub broadcast_room_event_usecase: Arc<BroadcastRoomEventUseCase>,
    /// DisconnectParticipantUseCase（接続切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
