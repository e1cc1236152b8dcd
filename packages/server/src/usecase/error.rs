//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{JoinRejection, RepositoryError};

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 接続が登録されていない（切断済み）
    #[error("connection '{0}' is not connected")]
    NotConnected(String),

    /// 二重参加などで拒否された（クライアントには join-rejected を通知済み）
    #[error("join to room '{room}' rejected: {}", .reason.as_str())]
    Rejected { room: String, reason: JoinRejection },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
