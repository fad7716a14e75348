//! Per-connection handler: the reader/writer task pair for one client.
//!
//! The flow is:
//!   1. WebSocket upgrade
//!   2. Spawn the writer task draining this connection's outbound queue
//!   3. Register with the dispatcher, send `connected` with the id
//!   4. Loop: decode envelopes, route to the dispatcher
//!   5. On close or error: dispatcher cleanup (leave room, notify)

use std::net::SocketAddr;
use std::sync::Arc;

use catclash_protocol::{ClientEvent, Codec, JsonCodec, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{Dispatcher, ServerError};

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(ServerError::Handshake)?;
    let (mut sink, mut stream) = ws.split();

    let codec = JsonCodec;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: the only place this connection is written to. The
    // unbounded queue in front of it means the simulation never waits on
    // a slow client; the queue dies with the connection.
    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(error) => {
                    tracing::error!(%error, "failed to encode server event");
                    continue;
                }
            };
            let Ok(text) = String::from_utf8(bytes) else {
                continue;
            };
            if sink.send(Message::text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let player_id = dispatcher.register_connection(event_tx.clone()).await;
    tracing::info!(%player_id, %addr, "client connected");
    let _ = event_tx.send(ServerEvent::Connected {
        player_id,
        message: "connected to the CatClash server".to_string(),
    });

    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(error) => {
                tracing::debug!(%player_id, %error, "recv error");
                break;
            }
        };
        let data = match msg {
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Binary(data) => data.to_vec(),
            Message::Close(_) => break,
            // Ping/pong and raw frames are transport noise.
            _ => continue,
        };

        match codec.decode::<ClientEvent>(&data) {
            Ok(event) => dispatcher.handle_event(player_id, event).await,
            Err(error) => {
                // Protocol failure: report it, keep the connection open.
                tracing::debug!(%player_id, %error, "malformed client event");
                let _ = event_tx.send(ServerEvent::Error {
                    message: format!("invalid message: {error}"),
                });
            }
        }
    }

    dispatcher.disconnect(player_id).await;

    // Dropping our sender (the registry's clone is gone too) lets the
    // writer drain anything already queued and exit.
    drop(event_tx);
    let _ = writer.await;
    Ok(())
}
