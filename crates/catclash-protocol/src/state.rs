//! Wire-visible game state.
//!
//! The server is authoritative: these structures are the full per-player
//! state as broadcast to clients, not a client-side projection. The room
//! engine owns and mutates them; this crate only defines their shape.
//!
//! Field names are camelCase on the wire. Maps are `BTreeMap` so snapshots
//! serialize with a stable key order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, RoomId};

/// Compounding multiplicative factors applied to a participant.
///
/// All start at 1.0 and are only ever multiplied into (never reset), so
/// energy-choice effects stack across a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifiers {
    /// Scales every earning: clicks, passive money, passive energy.
    pub earnings_multiplier: f64,
    /// Scales passive money income only (on top of `earnings_multiplier`).
    pub passive_earnings_multiplier: f64,
    /// Scales damage this participant *receives*.
    pub damage_multiplier: f64,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            earnings_multiplier: 1.0,
            passive_earnings_multiplier: 1.0,
            damage_multiplier: 1.0,
        }
    }
}

/// Authoritative state of one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub ready: bool,
    /// Invariant: `0 <= health <= max_health`.
    pub health: f64,
    pub max_health: f64,
    /// Invariant: `money >= 0`.
    pub money: f64,
    /// Invariant: `0 <= energy <= energy cap`.
    pub energy: f64,
    /// Invariant: `food >= 0`.
    pub food: f64,
    /// Passive rates. Monotonically non-decreasing over a match.
    pub money_per_second: f64,
    pub energy_per_second: f64,
    pub damage_per_second: f64,
    /// Currency granted per manual click.
    pub click_power: f64,
    pub modifiers: Modifiers,
    /// Upgrade id → purchased level.
    pub upgrades: BTreeMap<String, u32>,
    /// Stackable item id → count. Entries are removed at zero, not kept.
    pub items: BTreeMap<String, u32>,
}

/// Full snapshot of one room, sent as `room:state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub room_id: RoomId,
    pub game_started: bool,
    pub game_ended: bool,
    pub winner: Option<PlayerId>,
    pub players: BTreeMap<PlayerId, PlayerState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> PlayerState {
        PlayerState {
            id: PlayerId(1),
            name: "Misu".into(),
            ready: false,
            health: 10_000.0,
            max_health: 10_000.0,
            money: 50.0,
            energy: 100.0,
            food: 0.0,
            money_per_second: 0.0,
            energy_per_second: 1.0,
            damage_per_second: 0.0,
            click_power: 1.0,
            modifiers: Modifiers::default(),
            upgrades: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    #[test]
    fn test_modifiers_default_to_one() {
        let m = Modifiers::default();
        assert_eq!(m.earnings_multiplier, 1.0);
        assert_eq!(m.passive_earnings_multiplier, 1.0);
        assert_eq!(m.damage_multiplier, 1.0);
    }

    #[test]
    fn test_player_state_serializes_camel_case() {
        let json: serde_json::Value = serde_json::to_value(sample_player()).unwrap();
        assert_eq!(json["maxHealth"], 10_000.0);
        assert_eq!(json["moneyPerSecond"], 0.0);
        assert_eq!(json["clickPower"], 1.0);
        assert_eq!(json["modifiers"]["earningsMultiplier"], 1.0);
        // snake_case spellings must not leak onto the wire
        assert!(json.get("max_health").is_none());
    }

    #[test]
    fn test_player_state_round_trip() {
        let mut player = sample_player();
        player.upgrades.insert("milk_bowl".into(), 3);
        player.items.insert("gold_collar".into(), 2);
        let bytes = serde_json::to_vec(&player).unwrap();
        let decoded: PlayerState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(player, decoded);
    }

    #[test]
    fn test_snapshot_round_trip_with_numeric_player_keys() {
        let mut players = BTreeMap::new();
        players.insert(PlayerId(1), sample_player());
        let snapshot = GameSnapshot {
            room_id: RoomId(7),
            game_started: true,
            game_ended: false,
            winner: None,
            players,
        };
        let bytes = serde_json::to_vec(&snapshot).unwrap();
        let decoded: GameSnapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_snapshot_winner_is_null_until_ended() {
        let snapshot = GameSnapshot {
            room_id: RoomId(7),
            game_started: false,
            game_ended: false,
            winner: None,
            players: BTreeMap::new(),
        };
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert!(json["winner"].is_null());
        assert_eq!(json["gameStarted"], false);
    }
}
