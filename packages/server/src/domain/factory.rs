//! ID 生成

use uuid::Uuid;

use super::ConnectionId;

/// 接続 ID の生成
///
/// UUID v4 を使うため、切断済みの ID が再利用されることはない。
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId::from(Uuid::new_v4())
    }
}
