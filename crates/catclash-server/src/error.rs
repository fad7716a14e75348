//! Error types for the server layer.

/// Errors that can occur while running the server.
///
/// Everything else — bad envelopes, rejected actions, disconnects — is
/// handled in place and surfaced to clients as `error` events rather than
/// bubbling up here.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding the listen address failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// The WebSocket upgrade on a fresh connection failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),
}
