//! インメモリ Repository 実装
//!
//! プロセスのメモリ上にのみ状態を保持します（永続化なし）。

mod connection;
mod room;

pub use connection::InMemoryConnectionRepository;
pub use room::InMemoryRoomRepository;
