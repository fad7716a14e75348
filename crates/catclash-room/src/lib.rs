//! Room lifecycle and simulation engine for CatClash.
//!
//! Each room is the authoritative state of one two-participant match and
//! runs as an isolated Tokio task (actor model): the periodic tick and
//! inbound actions for a room are serialized through its command channel,
//! so state is never mutated concurrently. Different rooms run fully
//! independently.
//!
//! # Key types
//!
//! - [`Room`] — the pure state machine: validates and applies every
//!   action, runs the per-tick economy, detects the win condition, and
//!   emits events through the sink it was given at construction
//! - [`RoomHandle`] / [`spawn_room`] — the serialization boundary around
//!   a `Room`, owning the 1 Hz tick timer
//! - [`Phase`] — the Waiting → Active → Ended lifecycle
//! - [`GameConfig`] — initial values and simulation tunables

mod actor;
mod config;
mod error;
mod room;

pub use actor::{RoomHandle, spawn_room};
pub use config::{GameConfig, Phase};
pub use error::RoomError;
pub use room::{EventSink, Outbound, PlayerAction, Room};
