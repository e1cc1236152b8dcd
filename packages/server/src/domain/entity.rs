//! エンティティ
//!
//! - `Connection`: トランスポート接続ごとのセッション情報
//! - `Room`: 参加順に並んだメンバーの集合
//! - `Member`: ある接続のルームへの参加記録

use super::{ConnectionId, DisplayName, RoomError, RoomId, RoomKind, Timestamp};

/// 参加済みセッションの属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub room: RoomId,
    pub display_name: DisplayName,
}

/// 接続のセッション状態
///
/// `Unjoined -> Joined` の一方向に遷移する。`Joined -> Unjoined` は
/// 参加処理が途中で失敗したときのロールバックでのみ起こる。
/// 切断（Terminated）は Registry からのレコード削除で表現する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unjoined,
    Joined(Session),
}

/// 接続
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    pub state: SessionState,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            state: SessionState::Unjoined,
        }
    }

    /// セッション属性を設定する（既存の値は上書き）
    pub fn bind_session(&mut self, room: RoomId, display_name: DisplayName) {
        self.state = SessionState::Joined(Session { room, display_name });
    }

    pub fn current_room(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::Joined(session) => Some(&session.room),
            SessionState::Unjoined => None,
        }
    }

    /// セッション属性を取り消して未参加に戻す（参加処理のロールバック用）
    pub fn unbind_session(&mut self) {
        self.state = SessionState::Unjoined;
    }
}

/// ルームのメンバー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub voice_ready: bool,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            voice_ready: false,
            joined_at,
        }
    }
}

/// ルーム
///
/// `members` は参加順。同じ接続 ID のメンバーは高々 1 件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub members: Vec<Member>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, kind: RoomKind, created_at: Timestamp) -> Self {
        Self {
            id,
            kind,
            members: Vec::new(),
            created_at,
        }
    }

    /// メンバーを末尾に追加する
    pub fn add_member(&mut self, member: Member) -> Result<(), RoomError> {
        if self.contains(&member.connection_id) {
            return Err(RoomError::DuplicateMember(
                member.connection_id.into_string(),
            ));
        }
        self.members.push(member);
        Ok(())
    }

    /// 最初に一致したメンバーを取り除く
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.iter().any(|m| &m.connection_id == connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 音声準備完了フラグを立てる。メンバーが存在しなければ false
    pub fn set_voice_ready(&mut self, connection_id: &ConnectionId) -> bool {
        match self
            .members
            .iter_mut()
            .find(|m| &m.connection_id == connection_id)
        {
            Some(member) => {
                member.voice_ready = true;
                true
            }
            None => false,
        }
    }

    pub fn display_names(&self) -> Vec<DisplayName> {
        self.members.iter().map(|m| m.display_name.clone()).collect()
    }

    pub fn voice_ready_member_ids(&self) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|m| m.voice_ready)
            .map(|m| m.connection_id.clone())
            .collect()
    }
}
