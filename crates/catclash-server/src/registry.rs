//! Connection registry: maps assigned participant ids to live connections.
//!
//! The registry is not thread-safe by itself — it's a plain `HashMap`
//! owned by the [`Dispatcher`](crate::Dispatcher) behind a single mutex,
//! which is the one synchronization point for connection bookkeeping.
//! It owns no simulation state: rooms are referenced by id only.

use std::collections::HashMap;

use catclash_protocol::{PlayerId, RoomId, ServerEvent};
use tokio::sync::mpsc;

/// One connected client.
pub(crate) struct ClientEntry {
    /// Display name; empty until the first `player:join`.
    pub name: String,
    /// The room this participant is seated in, if any.
    pub room: Option<RoomId>,
    /// Outbound queue drained by the connection's writer task. Unbounded,
    /// so pushing never blocks the caller on a slow client.
    pub sender: mpsc::UnboundedSender<ServerEvent>,
}

/// All currently connected clients, keyed by assigned participant id.
#[derive(Default)]
pub(crate) struct ConnectionRegistry {
    clients: HashMap<PlayerId, ClientEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh connection with no name and no room.
    pub fn insert(&mut self, player_id: PlayerId, sender: mpsc::UnboundedSender<ServerEvent>) {
        self.clients.insert(
            player_id,
            ClientEntry {
                name: String::new(),
                room: None,
                sender,
            },
        );
    }

    pub fn remove(&mut self, player_id: PlayerId) -> Option<ClientEntry> {
        self.clients.remove(&player_id)
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&ClientEntry> {
        self.clients.get(&player_id)
    }

    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut ClientEntry> {
        self.clients.get_mut(&player_id)
    }

    /// Pushes an event onto a client's outbound queue. Silently drops if
    /// the client is gone — late events after a disconnect are expected.
    pub fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(entry) = self.clients.get(&player_id) {
            let _ = entry.sender.send(event);
        }
    }

    /// Participants currently assigned to the given room.
    pub fn members_of(&self, room_id: RoomId) -> Vec<PlayerId> {
        self.clients
            .iter()
            .filter(|(_, entry)| entry.room == Some(room_id))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (
        mpsc::UnboundedSender<ServerEvent>,
        mpsc::UnboundedReceiver<ServerEvent>,
    ) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_insert_and_send_to_delivers() {
        let mut registry = ConnectionRegistry::new();
        let (tx, mut rx) = channel();
        registry.insert(PlayerId(1), tx);

        registry.send_to(
            PlayerId(1),
            ServerEvent::Error {
                message: "hi".into(),
            },
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerEvent::Error { message } if message == "hi"
        ));
    }

    #[test]
    fn test_send_to_unknown_client_is_a_noop() {
        let registry = ConnectionRegistry::new();
        registry.send_to(
            PlayerId(99),
            ServerEvent::Error {
                message: "lost".into(),
            },
        );
    }

    #[test]
    fn test_members_of_filters_by_room() {
        let mut registry = ConnectionRegistry::new();
        for id in 1..=3 {
            let (tx, _rx) = channel();
            registry.insert(PlayerId(id), tx);
        }
        registry.get_mut(PlayerId(1)).unwrap().room = Some(RoomId(7));
        registry.get_mut(PlayerId(2)).unwrap().room = Some(RoomId(7));
        registry.get_mut(PlayerId(3)).unwrap().room = Some(RoomId(8));

        let mut members = registry.members_of(RoomId(7));
        members.sort();
        assert_eq!(members, vec![PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        registry.insert(PlayerId(1), tx);
        registry.get_mut(PlayerId(1)).unwrap().name = "Misu".into();

        let entry = registry.remove(PlayerId(1)).unwrap();
        assert_eq!(entry.name, "Misu");
        assert_eq!(registry.len(), 0);
        assert!(registry.get(PlayerId(1)).is_none());
    }
}
