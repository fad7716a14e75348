//! Session dispatcher: routes intents to rooms and room events back to
//! connections.
//!
//! The dispatcher owns the connection registry and the room directory,
//! each behind its own mutex (always taken one at a time, never nested).
//! Rooms themselves are actors — the dispatcher only holds their handles,
//! so a held lock never overlaps with room state mutation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;

use catclash_protocol::{ClientEvent, PlayerId, RoomId, ServerEvent};
use catclash_room::{GameConfig, PlayerAction, RoomHandle, spawn_room};
use tokio::sync::{Mutex, mpsc};

use crate::registry::ConnectionRegistry;

/// Counters for server-assigned identities. Globally unique for the
/// process lifetime.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Active rooms plus the pairing slot.
#[derive(Default)]
struct RoomDirectory {
    rooms: HashMap<RoomId, RoomHandle>,
    /// The room currently collecting participants, if any. A join lands
    /// here while a seat is free; otherwise a new room takes this slot.
    waiting: Option<RoomId>,
}

impl RoomDirectory {
    fn get(&self, room_id: RoomId) -> Option<&RoomHandle> {
        self.rooms.get(&room_id)
    }

    fn insert(&mut self, handle: RoomHandle) {
        self.waiting = Some(handle.room_id());
        self.rooms.insert(handle.room_id(), handle);
    }

    fn remove(&mut self, room_id: RoomId) -> Option<RoomHandle> {
        if self.waiting == Some(room_id) {
            self.waiting = None;
        }
        self.rooms.remove(&room_id)
    }
}

/// Routes everything between connections and rooms.
pub struct Dispatcher {
    clients: Mutex<ConnectionRegistry>,
    rooms: Mutex<RoomDirectory>,
    config: GameConfig,
    /// Cloned into every spawned room as its broadcast callback.
    outbound_tx: mpsc::UnboundedSender<(PlayerId, ServerEvent)>,
}

impl Dispatcher {
    /// Creates the dispatcher and starts its fan-out task, which delivers
    /// room-emitted events to the target connections.
    pub fn new(config: GameConfig) -> Arc<Self> {
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let dispatcher = Arc::new(Self {
            clients: Mutex::new(ConnectionRegistry::new()),
            rooms: Mutex::new(RoomDirectory::default()),
            config,
            outbound_tx,
        });

        let fan_out = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            while let Some((player_id, event)) = outbound_rx.recv().await {
                fan_out.clients.lock().await.send_to(player_id, event);
            }
        });

        dispatcher
    }

    /// Registers a fresh connection and assigns its participant id.
    pub async fn register_connection(
        &self,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> PlayerId {
        let player_id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        let mut clients = self.clients.lock().await;
        clients.insert(player_id, sender);
        tracing::debug!(%player_id, connections = clients.len(), "connection registered");
        player_id
    }

    /// Routes one decoded client intent.
    pub async fn handle_event(&self, player_id: PlayerId, event: ClientEvent) {
        let action = match event {
            ClientEvent::Join { player_name } => {
                return self.handle_join(player_id, player_name).await;
            }
            ClientEvent::Ready {} => PlayerAction::Ready,
            ClientEvent::Click {} => PlayerAction::Click,
            ClientEvent::BuyFood { amount } => PlayerAction::BuyFood { amount },
            ClientEvent::BuyUpgrade { upgrade_id } => PlayerAction::BuyUpgrade { upgrade_id },
            ClientEvent::BuyAttack { attack_id } => PlayerAction::BuyAttack { attack_id },
            ClientEvent::BuyItem { item_id } => PlayerAction::BuyItem { item_id },
            ClientEvent::UseItem { item_id } => PlayerAction::UseItem { item_id },
            ClientEvent::EnergyChoice { choice_id } => PlayerAction::EnergyChoice { choice_id },
        };
        self.route_action(player_id, action).await;
    }

    /// Seats a participant in the waiting room, opening a new one when
    /// none is open or the open one has filled.
    async fn handle_join(&self, player_id: PlayerId, player_name: String) {
        let name = player_name.trim().to_string();
        if name.is_empty() {
            self.send_error(player_id, "invalid player name").await;
            return;
        }

        let already_seated = {
            let clients = self.clients.lock().await;
            clients.get(player_id).is_some_and(|c| c.room.is_some())
        };
        if already_seated {
            self.send_error(player_id, "already in a room").await;
            return;
        }

        let room_id = {
            let mut rooms = self.rooms.lock().await;

            let seated = match rooms.waiting.and_then(|rid| rooms.get(rid).cloned()) {
                Some(handle) => handle
                    .join(player_id, name.clone())
                    .await
                    .ok()
                    .map(|()| handle.room_id()),
                None => None,
            };

            match seated {
                Some(room_id) => room_id,
                None => {
                    // No open seat anywhere: spin up a fresh room.
                    let handle = spawn_room(
                        RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed)),
                        self.config.clone(),
                        self.outbound_tx.clone(),
                    );
                    let room_id = handle.room_id();
                    tracing::info!(%room_id, "room created");
                    let result = handle.join(player_id, name.clone()).await;
                    rooms.insert(handle);
                    match result {
                        Ok(()) => room_id,
                        Err(e) => {
                            drop(rooms);
                            self.send_error(player_id, &e.to_string()).await;
                            return;
                        }
                    }
                }
            }
        };

        {
            let mut clients = self.clients.lock().await;
            if let Some(entry) = clients.get_mut(player_id) {
                entry.name = name.clone();
                entry.room = Some(room_id);
            }
        }
        tracing::info!(%player_id, name = %name, %room_id, "player joined room");
    }

    /// Forwards a gameplay action to the participant's room; validation
    /// failures come back as `error` events to the originating side only.
    async fn route_action(&self, player_id: PlayerId, action: PlayerAction) {
        let room_id = {
            let clients = self.clients.lock().await;
            clients.get(player_id).and_then(|entry| entry.room)
        };
        let Some(room_id) = room_id else {
            self.send_error(player_id, "not in a room").await;
            return;
        };

        let handle = {
            let rooms = self.rooms.lock().await;
            rooms.get(room_id).cloned()
        };
        let Some(handle) = handle else {
            self.send_error(player_id, "room no longer exists").await;
            return;
        };

        if let Err(e) = handle.act(player_id, action).await {
            self.send_error(player_id, &e.to_string()).await;
        }
    }

    /// Cleans up after a dropped connection: leaves the room (which ends a
    /// running match), destroys the room if it emptied, and tells the
    /// survivor who left. Disconnects are lifecycle, not errors.
    pub async fn disconnect(&self, player_id: PlayerId) {
        let entry = self.clients.lock().await.remove(player_id);
        let Some(entry) = entry else { return };
        tracing::info!(%player_id, name = %entry.name, "client disconnected");

        let Some(room_id) = entry.room else { return };
        let handle = {
            let rooms = self.rooms.lock().await;
            rooms.get(room_id).cloned()
        };
        let Some(handle) = handle else { return };

        match handle.leave(player_id).await {
            Ok(0) => {
                self.rooms.lock().await.remove(room_id);
                let _ = handle.shutdown().await;
                tracing::info!(%room_id, "room destroyed");
            }
            Ok(_) => {
                let clients = self.clients.lock().await;
                for pid in clients.members_of(room_id) {
                    clients.send_to(
                        pid,
                        ServerEvent::PlayerDisconnected {
                            player_id,
                            player_name: entry.name.clone(),
                        },
                    );
                }
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "leave failed");
            }
        }
    }

    async fn send_error(&self, player_id: PlayerId, message: &str) {
        let clients = self.clients.lock().await;
        clients.send_to(
            player_id,
            ServerEvent::Error {
                message: message.to_string(),
            },
        );
    }
}
