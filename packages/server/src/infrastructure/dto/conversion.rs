//! Conversion logic between DTOs and domain types.

use crate::domain::{
    ConnectionId, DisplayName, DomainError, InboundEvent, Member, Room, RoomEvent, RoomId,
    ServerEvent, SignalKind,
};
use crate::infrastructure::dto::{
    http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket::{ClientMessage, ServerMessage},
};
use twincanvas_shared::time::timestamp_to_rfc3339;

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientMessage> for InboundEvent {
    type Error = DomainError;

    fn try_from(message: ClientMessage) -> Result<Self, Self::Error> {
        let event = match message {
            ClientMessage::JoinRoom {
                kind,
                room,
                display_name,
            } => InboundEvent::Join {
                kind,
                room: RoomId::new(room)?,
                display_name: DisplayName::new(display_name),
            },
            ClientMessage::VoiceReady { room } => InboundEvent::VoiceReady {
                room: RoomId::new(room)?,
            },
            ClientMessage::SessionOffer { room, to, payload } => {
                signal(SignalKind::SessionOffer, room, to, payload)?
            }
            ClientMessage::SessionAnswer { room, to, payload } => {
                signal(SignalKind::SessionAnswer, room, to, payload)?
            }
            ClientMessage::IceCandidate { room, to, payload } => {
                signal(SignalKind::IceCandidate, room, to, payload)?
            }
            ClientMessage::Draw { room, stroke } => room_event(room, RoomEvent::Draw(stroke))?,
            ClientMessage::Clear { room } => room_event(room, RoomEvent::Clear)?,
            ClientMessage::Undo { room, state } => {
                room_event(room, RoomEvent::Undo { snapshot: state })?
            }
            ClientMessage::PlaybackPlay { room } => room_event(room, RoomEvent::PlaybackPlay)?,
            ClientMessage::PlaybackPause { room } => room_event(room, RoomEvent::PlaybackPause)?,
            ClientMessage::PlaybackSeek { room, time } => {
                room_event(room, RoomEvent::PlaybackSeek { time })?
            }
            ClientMessage::PlaybackDuration { room, duration } => {
                room_event(room, RoomEvent::PlaybackDuration { duration })?
            }
            ClientMessage::PlaybackTimeUpdate { room, time } => {
                room_event(room, RoomEvent::PlaybackTimeUpdate { time })?
            }
        };
        Ok(event)
    }
}

fn signal(
    kind: SignalKind,
    room: String,
    to: String,
    payload: serde_json::Value,
) -> Result<InboundEvent, DomainError> {
    Ok(InboundEvent::Signal {
        kind,
        room: RoomId::new(room)?,
        to: ConnectionId::new(to)?,
        payload,
    })
}

fn room_event(room: String, event: RoomEvent) -> Result<InboundEvent, DomainError> {
    Ok(InboundEvent::Room {
        room: RoomId::new(room)?,
        event,
    })
}

// ========================================
// Domain → DTO
// ========================================

impl From<ServerEvent> for ServerMessage {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Connected { connection_id } => ServerMessage::Connected {
                connection_id: connection_id.into_string(),
            },
            ServerEvent::PresenceUpdate { names } => ServerMessage::PresenceUpdate {
                names: names.into_iter().map(DisplayName::into_string).collect(),
            },
            ServerEvent::VoicePeersSnapshot { connection_ids } => {
                ServerMessage::VoicePeersSnapshot {
                    connection_ids: connection_ids
                        .into_iter()
                        .map(ConnectionId::into_string)
                        .collect(),
                }
            }
            ServerEvent::VoicePeerJoined { connection_id } => ServerMessage::VoicePeerJoined {
                connection_id: connection_id.into_string(),
            },
            ServerEvent::VoicePeerLeft { connection_id } => ServerMessage::VoicePeerLeft {
                connection_id: connection_id.into_string(),
            },
            ServerEvent::Signal {
                kind,
                from,
                payload,
            } => {
                let from = from.into_string();
                match kind {
                    SignalKind::SessionOffer => ServerMessage::SessionOffer { from, payload },
                    SignalKind::SessionAnswer => ServerMessage::SessionAnswer { from, payload },
                    SignalKind::IceCandidate => ServerMessage::IceCandidate { from, payload },
                }
            }
            ServerEvent::Room { room, event } => match event {
                RoomEvent::Draw(stroke) => ServerMessage::Draw {
                    room: room.into_string(),
                    stroke,
                },
                RoomEvent::Clear => ServerMessage::Clear,
                RoomEvent::Undo { snapshot } => ServerMessage::Undo { state: snapshot },
                RoomEvent::PlaybackPlay => ServerMessage::PlaybackPlay,
                RoomEvent::PlaybackPause => ServerMessage::PlaybackPause,
                RoomEvent::PlaybackSeek { time } => ServerMessage::PlaybackSeek { time },
                RoomEvent::PlaybackDuration { duration } => {
                    ServerMessage::PlaybackDuration { duration }
                }
                RoomEvent::PlaybackTimeUpdate { time } => {
                    ServerMessage::PlaybackTimeUpdate { time }
                }
            },
            ServerEvent::JoinRejected { room, reason } => ServerMessage::JoinRejected {
                room: room.into_string(),
                reason: reason.as_str().to_string(),
            },
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            kind: room.kind,
            members: room
                .members
                .iter()
                .map(|m| m.display_name.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Member> for MemberDetailDto {
    fn from(member: &Member) -> Self {
        Self {
            connection_id: member.connection_id.as_str().to_string(),
            display_name: member.display_name.as_str().to_string(),
            voice_ready: member.voice_ready,
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}

impl From<Room> for RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            members: room.members.iter().map(MemberDetailDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            id: room.id.into_string(),
            kind: room.kind,
        }
    }
}
