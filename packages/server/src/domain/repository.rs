//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 状態はプロセスのメモリ上にのみ存在し、再起動で失われます。

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, DisplayName, Member, RepositoryError, Room, RoomId, RoomKind,
};

/// Connection Registry
///
/// 接続 ID からセッション属性への対応を保持する。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 空の接続レコードを登録
    async fn register(&self, connection: Connection);

    /// セッション属性（ルーム・表示名）を設定。既存の値は上書き
    async fn set_session(
        &self,
        connection_id: &ConnectionId,
        room: RoomId,
        display_name: DisplayName,
    ) -> Result<(), RepositoryError>;

    /// セッション属性を取り消して未参加に戻す。接続が無ければ何もしない
    async fn clear_session(&self, connection_id: &ConnectionId);

    /// 接続が参加しているルームを取得（切断処理用）
    async fn lookup_room(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 接続レコードを取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続レコードを削除
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;
}

/// Room Directory
///
/// ルーム ID から参加順のメンバー列への対応を保持する。
/// メンバーが 0 人になったルームは同じ操作の中で削除され、外から観測されることはない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// メンバーを追加。ルームが無ければ `kind` で作成する
    async fn join(
        &self,
        room_id: &RoomId,
        kind: RoomKind,
        member: Member,
    ) -> Result<Member, RepositoryError>;

    /// メンバーを削除。空になったルームは削除する
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member>;

    /// 参加順のメンバー一覧（スナップショット）。ルームが無ければ空
    async fn members(&self, room_id: &RoomId) -> Vec<Member>;

    /// 音声準備完了にする。ルームまたはメンバーが無ければ false
    async fn set_voice_ready(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool;

    /// 音声準備完了のメンバー ID（参加順）
    async fn voice_ready_member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームのスナップショットを ID 順で取得
    async fn list_rooms(&self) -> Vec<Room>;
}
