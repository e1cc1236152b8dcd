//! TwinCanvas signaling server.
//!
//! Tracks rooms and presence, relays drawing / playback events within a room
//! and forwards WebRTC signaling between peers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin twincanvas-server
//! cargo run --bin twincanvas-server -- --host 0.0.0.0 --port 3000
//! PORT=8080 cargo run --bin twincanvas-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use twincanvas_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
    },
    ui::{AppState, Server},
    usecase::{
        BroadcastRoomEventUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, MarkVoiceReadyUseCase, MembershipLock,
        PresenceBroadcaster, RegisterConnectionUseCase, RelaySignalUseCase,
    },
};
use twincanvas_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "twincanvas-server")]
#[command(about = "Room, presence and WebRTC signaling relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create Repositories (in-memory)
    let connection_repository = Arc::new(InMemoryConnectionRepository::new());
    let room_repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let clock = Arc::new(SystemClock);
    let membership_lock: MembershipLock = Arc::new(Mutex::new(()));

    let broadcast_room_event_usecase = Arc::new(BroadcastRoomEventUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
    ));
    let presence = Arc::new(PresenceBroadcaster::new(
        room_repository.clone(),
        message_pusher.clone(),
        broadcast_room_event_usecase.clone(),
    ));
    let register_connection_usecase = Arc::new(RegisterConnectionUseCase::new(
        connection_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        connection_repository.clone(),
        room_repository.clone(),
        message_pusher.clone(),
        presence.clone(),
        membership_lock.clone(),
        clock,
    ));
    let mark_voice_ready_usecase = Arc::new(MarkVoiceReadyUseCase::new(
        room_repository.clone(),
        presence.clone(),
        membership_lock.clone(),
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(message_pusher.clone()));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        connection_repository,
        room_repository.clone(),
        message_pusher,
        presence,
        membership_lock,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(room_repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(room_repository));

    // 4. Create AppState
    let app_state = AppState {
        register_connection_usecase,
        join_room_usecase,
        mark_voice_ready_usecase,
        relay_signal_usecase,
        broadcast_room_event_usecase,
        disconnect_participant_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    };

    // 5. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
