//! HTTP API response DTOs.

use serde::Serialize;

use crate::domain::RoomKind;

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub kind: RoomKind,
    /// Display names in join order
    pub members: Vec<String>,
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub kind: RoomKind,
    pub members: Vec<MemberDetailDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub display_name: String,
    pub voice_ready: bool,
    pub joined_at: String,
}
