//! Wire protocol for CatClash.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — every message on the
//!   wire is an `{event, data}` envelope; the enums here decode/encode that
//!   shape directly via serde's adjacent tagging.
//! - **State** ([`PlayerState`], [`GameSnapshot`]) — the authoritative
//!   per-player state and full-room snapshot as they appear on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! engine (game rules). It doesn't know about connections or rooms — it
//! only knows how to serialize and deserialize messages.

mod codec;
mod error;
mod state;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use state::{GameSnapshot, Modifiers, PlayerState};
pub use types::{ClientEvent, PlayerId, Recipient, RoomId, ServerEvent};
