//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 全ルームを 1 つの Mutex で保護するため、参加・退出とそれに伴う
//! ルームの作成・削除は常に 1 つのクリティカルセクション内で完結します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, RepositoryError, Room, RoomError, RoomId, RoomKind, RoomRepository,
};

/// インメモリ Room Directory
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        room_id: &RoomId,
        kind: RoomKind,
        member: Member,
    ) -> Result<Member, RepositoryError> {
        let mut rooms = self.rooms.lock().await;

        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created ({})", room_id, kind.as_str());
            Room::new(room_id.clone(), kind, member.joined_at)
        });

        match room.add_member(member.clone()) {
            Ok(()) => Ok(member),
            Err(RoomError::DuplicateMember(connection)) => {
                Err(RepositoryError::DuplicateMember {
                    room: room_id.to_string(),
                    connection,
                })
            }
        }
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
        let mut rooms = self.rooms.lock().await;

        let room = rooms.get_mut(room_id)?;
        let removed = room.remove_member(connection_id);

        if room.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room '{}' deleted (no members left)", room_id);
        }

        removed
    }

    async fn members(&self, room_id: &RoomId) -> Vec<Member> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    async fn set_voice_ready(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        rooms
            .get_mut(room_id)
            .is_some_and(|room| room.set_voice_ready(connection_id))
    }

    async fn voice_ready_member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Room::voice_ready_member_ids)
            .unwrap_or_default()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<Room> = rooms.values().cloned().collect();
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }
}
