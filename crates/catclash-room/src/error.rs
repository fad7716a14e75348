//! Error types for the room layer.
//!
//! Every variant is a precondition failure: the operation performed no
//! mutation and the message is surfaced to the originating client as an
//! `error` event.

use catclash_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The participant is not seated in this room.
    #[error("player {0} is not in this room")]
    UnknownPlayer(PlayerId),

    /// The participant already holds a seat here.
    #[error("player {0} is already in this room")]
    AlreadySeated(PlayerId),

    /// Join or ready arrived after the match began.
    #[error("the match has already started")]
    MatchStarted,

    /// A gameplay action arrived before the match began.
    #[error("the match has not started yet")]
    MatchNotStarted,

    /// A mutating operation arrived after the match ended.
    #[error("the match is over")]
    MatchOver,

    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("unknown attack: {0}")]
    UnknownAttack(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("unknown energy choice: {0}")]
    UnknownChoice(String),

    #[error("upgrade {0} is already at max level")]
    MaxLevel(String),

    #[error("not enough money")]
    InsufficientMoney,

    #[error("not enough energy")]
    InsufficientEnergy,

    #[error("not enough food")]
    InsufficientFood,

    /// Energy choices unlock only at the energy cap.
    #[error("energy has not reached the threshold")]
    EnergyBelowThreshold,

    #[error("item {0} is not in the inventory")]
    ItemNotOwned(String),

    /// Attacks need a target.
    #[error("no opponent present")]
    NoOpponent,

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
