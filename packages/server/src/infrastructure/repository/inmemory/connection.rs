//! InMemory Connection Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, DisplayName, RepositoryError, RoomId,
};

/// インメモリ Connection Registry
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered", connection.id);
        connections.insert(connection.id.clone(), connection);
    }

    async fn set_session(
        &self,
        connection_id: &ConnectionId,
        room: RoomId,
        display_name: DisplayName,
    ) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(connection_id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(connection_id.to_string()))?;
        connection.bind_session(room, display_name);
        Ok(())
    }

    async fn clear_session(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        if let Some(connection) = connections.get_mut(connection_id) {
            connection.unbind_session();
        }
    }

    async fn lookup_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .and_then(|c| c.current_room().cloned())
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.get(connection_id).cloned()
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id);
        if removed.is_some() {
            tracing::debug!("Connection '{}' removed", connection_id);
        }
        removed
    }
}
