//! Core protocol types for CatClash's wire format.
//!
//! Every message on the wire is an `{event, data}` envelope. Rather than
//! modeling the envelope as a separate wrapper struct, the [`ClientEvent`]
//! and [`ServerEvent`] enums use serde's adjacent tagging
//! (`tag = "event", content = "data"`) so that each variant serializes to
//! exactly that shape — e.g. `{"event": "player:join", "data":
//! {"playerName": "Misu"}}`.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::state::{GameSnapshot, PlayerState};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// Newtype over `u64`, assigned by the server from a process-wide counter.
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`,
/// which is what the client SDK expects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one match instance).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// The room emits `(Recipient, ServerEvent)` pairs; the actor resolves each
/// recipient against current room membership before fan-out. `AllExcept`
/// covers the deliberate self-exclusions in the protocol: attack
/// notifications go only to the party being hit, opponent mirrors go only
/// to the non-owning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every participant currently in the room.
    All,
    /// One specific participant.
    Player(PlayerId),
    /// Everyone except the specified participant.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Client → server events
// ---------------------------------------------------------------------------

/// Intents a client can send.
///
/// Data payloads use camelCase field names on the wire (`playerName`,
/// `upgradeId`, …) to match the client's conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Request a seat in a room, creating one if none is waiting.
    #[serde(rename = "player:join", rename_all = "camelCase")]
    Join { player_name: String },

    /// Declare readiness. The match starts when both seats are ready.
    #[serde(rename = "player:ready")]
    Ready {},

    /// One manual currency-earning action.
    #[serde(rename = "player:click")]
    Click {},

    /// Convert energy into food. `amount` defaults to 10 when absent.
    #[serde(rename = "player:buy_food")]
    BuyFood {
        #[serde(default = "default_food_amount")]
        amount: u32,
    },

    /// Buy one level of a permanent upgrade.
    #[serde(rename = "player:buy_upgrade", rename_all = "camelCase")]
    BuyUpgrade { upgrade_id: String },

    /// Spend food on an instant or passive attack.
    #[serde(rename = "player:buy_attack", rename_all = "camelCase")]
    BuyAttack { attack_id: String },

    /// Buy an item; stackables go to the inventory, single-use items
    /// apply immediately.
    #[serde(rename = "player:buy_item", rename_all = "camelCase")]
    BuyItem { item_id: String },

    /// Consume one stacked item from the inventory.
    #[serde(rename = "player:use_item", rename_all = "camelCase")]
    UseItem { item_id: String },

    /// Resolve the forced choice offered when energy hits the cap.
    #[serde(rename = "player:energy_choice", rename_all = "camelCase")]
    EnergyChoice { choice_id: String },
}

fn default_food_amount() -> u32 {
    10
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Sent once when the connection opens, carrying the assigned id.
    #[serde(rename = "connected", rename_all = "camelCase")]
    Connected { player_id: PlayerId, message: String },

    /// Full room snapshot. Sent on join, ready, and match start.
    #[serde(rename = "room:state", rename_all = "camelCase")]
    RoomState { game_state: GameSnapshot },

    /// The match transitioned to Active.
    #[serde(rename = "game:start")]
    GameStart {},

    /// One simulation step completed. `timestamp` is Unix-epoch millis.
    #[serde(rename = "game:tick")]
    GameTick { timestamp: u64 },

    /// Authoritative state of one participant, addressed to everyone.
    #[serde(rename = "player:update", rename_all = "camelCase")]
    PlayerUpdate { player_id: PlayerId, player: PlayerState },

    /// The same payload mirrored to the non-owning side.
    #[serde(rename = "enemy:update", rename_all = "camelCase")]
    EnemyUpdate { player_id: PlayerId, player: PlayerState },

    /// Sent only to the party that was hit by an instant attack.
    #[serde(rename = "attack:received", rename_all = "camelCase")]
    AttackReceived { attack_name: String, damage: f64 },

    /// Sent only to the party whose energy just reached the cap.
    #[serde(rename = "energy:threshold_reached")]
    EnergyThresholdReached {},

    /// A participant's connection dropped; sent to the survivor.
    #[serde(rename = "player:disconnected", rename_all = "camelCase")]
    PlayerDisconnected {
        player_id: PlayerId,
        player_name: String,
    },

    /// The match ended.
    #[serde(rename = "game:end", rename_all = "camelCase")]
    GameEnd {
        winner_id: PlayerId,
        winner_name: String,
    },

    /// The most recent intent was rejected; no state changed.
    #[serde(rename = "error")]
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
