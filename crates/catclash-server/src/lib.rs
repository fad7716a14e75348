//! # CatClash server
//!
//! The session dispatcher and WebSocket front end for the CatClash match
//! engine. The server is authoritative: clients send intents as
//! `{event, data}` envelopes and receive authoritative state back.
//!
//! Layering: each accepted connection gets a reader task and a writer
//! task; intents are routed through the [`Dispatcher`] to the owning room
//! actor; events emitted by rooms come back through a fan-out task that
//! looks up the target connections in the registry.

mod dispatcher;
mod error;
mod handler;
mod registry;
mod server;

pub use dispatcher::Dispatcher;
pub use error::ServerError;
pub use server::{Server, ServerBuilder};
