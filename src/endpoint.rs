//! Endpoint factory: outbound connections and the server accept loop.
//!
//! Neither entry point participates in framing; both bind a socket to a
//! fresh [`Connection`] state machine and start its read path.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::connection::{Connection, ConnectionListener};
use crate::error::{Iec60870Error, Result};
use crate::settings::ConnectionSettings;

/// Decides about incoming connections on a listening endpoint.
#[async_trait]
pub trait ConnectionAcceptor: Send + Sync {
    /// Supply the listener for a connection from `peer`, or `None` to
    /// refuse it.
    async fn listener_for(&self, peer: SocketAddr) -> Option<Arc<dyn ConnectionListener>>;

    /// Receive the connection once its read path is running.
    async fn connected(&self, connection: Connection);
}

/// Connect to a controlled station (server) as controlling station.
///
/// The returned connection is in `Idle` state; call
/// [`Connection::start_data_transfer`] to begin the I-frame exchange.
pub async fn connect<A>(
    addr: A,
    settings: ConnectionSettings,
    listener: Arc<dyn ConnectionListener>,
) -> Result<Connection>
where
    A: ToSocketAddrs,
{
    let stream = tokio::time::timeout(settings.connect_timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| Iec60870Error::ConnectTimeout)??;
    Connection::spawn(stream, settings, listener)
}

/// A listening endpoint handing out server-side connections.
pub struct Server {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
}

impl Server {
    /// The address the endpoint is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections. Connections already handed out keep
    /// running until closed individually.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Listen for controlling stations as controlled station.
///
/// Every accepted socket is wired to a new [`Connection`] whose listener
/// the acceptor supplies; the connection is then handed to
/// [`ConnectionAcceptor::connected`].
pub async fn listen<A>(
    addr: A,
    settings: ConnectionSettings,
    acceptor: Arc<dyn ConnectionAcceptor>,
) -> Result<Server>
where
    A: ToSocketAddrs,
{
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let shutdown = CancellationToken::new();
    info!(%local_addr, "listening");

    let token = shutdown.clone();
    tokio::spawn(async move {
        loop {
            let accepted = tokio::select! {
                _ = token.cancelled() => break,
                accepted = listener.accept() => accepted,
            };
            match accepted {
                Ok((stream, peer)) => {
                    let Some(connection_listener) = acceptor.listener_for(peer).await else {
                        debug!(%peer, "connection refused");
                        continue;
                    };
                    match Connection::spawn(stream, settings.clone(), connection_listener) {
                        Ok(connection) => {
                            info!(%peer, "accepted connection");
                            acceptor.connected(connection).await;
                        }
                        Err(error) => {
                            warn!(%peer, error = %error, "failed to set up connection");
                        }
                    }
                }
                Err(error) => {
                    warn!(error = %error, "accept failed");
                }
            }
        }
        debug!(%local_addr, "listener stopped");
    });

    Ok(Server {
        local_addr,
        shutdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefuseAll;

    #[async_trait]
    impl ConnectionAcceptor for RefuseAll {
        async fn listener_for(&self, _peer: SocketAddr) -> Option<Arc<dyn ConnectionListener>> {
            None
        }
        async fn connected(&self, _connection: Connection) {}
    }

    #[tokio::test]
    async fn test_listen_binds_ephemeral_port() {
        let server = listen("127.0.0.1:0", ConnectionSettings::default(), Arc::new(RefuseAll))
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
        server.shutdown();
    }

    #[tokio::test]
    async fn test_connect_refused_address() {
        struct Null;
        #[async_trait]
        impl ConnectionListener for Null {
            async fn on_asdu_received(&self, _c: &Connection, _a: crate::types::Asdu) {}
            async fn on_connection_lost(&self, _c: &Connection, _e: Iec60870Error) {}
        }

        // A port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = connect(addr, ConnectionSettings::default(), Arc::new(Null)).await;
        assert!(result.is_err());
    }
}
