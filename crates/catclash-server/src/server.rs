//! `Server` builder and accept loop.
//!
//! Ties the layers together: TCP accept → WebSocket upgrade → per-
//! connection handler → dispatcher → room actors.

use std::sync::Arc;

use catclash_room::GameConfig;
use tokio::net::TcpListener;

use crate::handler::handle_connection;
use crate::{Dispatcher, ServerError};

/// Builder for configuring and starting a CatClash server.
///
/// # Example
///
/// ```rust,no_run
/// use catclash_server::Server;
///
/// # async fn run() -> Result<(), catclash_server::ServerError> {
/// let server = Server::builder().bind("0.0.0.0:3001").build().await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    config: GameConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            config: GameConfig::default(),
        }
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the game configuration for every room this server opens.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and wires up the dispatcher.
    pub async fn build(self) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!(addr = %self.bind_addr, "WebSocket server listening");
        Ok(Server {
            listener,
            dispatcher: Dispatcher::new(self.config),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running CatClash server.
pub struct Server {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("CatClash server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let dispatcher = Arc::clone(&self.dispatcher);
                    tokio::spawn(async move {
                        if let Err(error) = handle_connection(stream, addr, dispatcher).await {
                            tracing::debug!(%error, "connection ended with error");
                        }
                    });
                }
                Err(error) => {
                    tracing::error!(%error, "accept failed");
                }
            }
        }
    }
}
