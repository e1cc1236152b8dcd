//! UseCase: ルーム一覧・詳細の取得
//!
//! HTTP API から Room Directory の現在の状態を参照するためのユースケース。
//! 参照のみでメンバーシップは変更しないため、メンバーシップロックは取らない。

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// ルーム ID 順のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.room_repository.list_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.room_repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
