//! Shard servers and the local cluster launcher.

use axum::{
    Router,
    extract::Extension,
    routing::any,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::handlers::{handle_get, handle_list, handle_put};
use super::memory::ShardStore;
use super::protocol::{ENDPOINT_GET, ENDPOINT_LIST, ENDPOINT_PUT};
use crate::error::ServerError;

/// Builds the HTTP router for one shard.
///
/// Handlers take every method so they can reject a malformed path with 404 before
/// answering a wrong method with 405. Anything else is 404.
pub fn router(store: Arc<ShardStore>) -> Router {
    Router::new()
        .route(ENDPOINT_LIST, any(handle_list))
        .route(ENDPOINT_GET, any(handle_get))
        .route(ENDPOINT_PUT, any(handle_put))
        .layer(Extension(store))
}

/// One shard: a bound listener and the store it serves.
pub struct ShardServer {
    listener: TcpListener,
    addr: SocketAddr,
    store: Arc<ShardStore>,
}

impl ShardServer {
    /// Binds `addr` with a fresh, empty store. Port 0 picks an ephemeral port.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            addr,
            store: Arc::new(ShardStore::new()),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn store(&self) -> Arc<ShardStore> {
        self.store.clone()
    }

    /// Serves requests until the listener fails. Every connection runs on its own task.
    pub async fn serve(self) -> std::io::Result<()> {
        tracing::info!("Shard server listening on {}", self.addr);
        axum::serve(self.listener, router(self.store)).await
    }
}

struct RunningShard {
    addr: SocketAddr,
    store: Arc<ShardStore>,
    handle: JoinHandle<std::io::Result<()>>,
}

/// A set of independent shard servers running in this process.
///
/// The servers share no state and never talk to each other. Dropping the cluster stops
/// every server.
pub struct Cluster {
    shards: Vec<RunningShard>,
}

impl Cluster {
    /// Binds one server per port on `host`, then starts them all.
    ///
    /// Every port is bound before any server starts, so a bind failure leaves nothing
    /// running.
    pub async fn start<I>(host: IpAddr, ports: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut servers = Vec::new();
        for port in ports {
            servers.push(ShardServer::bind(SocketAddr::new(host, port)).await?);
        }

        let shards = servers
            .into_iter()
            .map(|server| {
                let addr = server.local_addr();
                let store = server.store();
                let handle = tokio::spawn(server.serve());
                RunningShard {
                    addr,
                    store,
                    handle,
                }
            })
            .collect::<Vec<_>>();

        tracing::info!("Cluster started with {} shard servers", shards.len());
        Ok(Self { shards })
    }

    /// Bound addresses, in the order the ports were given.
    pub fn addrs(&self) -> Vec<SocketAddr> {
        self.shards.iter().map(|shard| shard.addr).collect()
    }

    /// The store served at `addr`, if that address belongs to the cluster.
    pub fn store(&self, addr: SocketAddr) -> Option<Arc<ShardStore>> {
        self.shards
            .iter()
            .find(|shard| shard.addr == addr)
            .map(|shard| shard.store.clone())
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Waits for every server to exit, logging how each one ended.
    pub async fn wait(mut self) {
        for shard in std::mem::take(&mut self.shards) {
            match shard.handle.await {
                Ok(Ok(())) => tracing::info!("Shard server {} shut down", shard.addr),
                Ok(Err(e)) => tracing::error!("Shard server {} failed: {}", shard.addr, e),
                Err(e) if e.is_cancelled() => {
                    tracing::info!("Shard server {} stopped", shard.addr)
                }
                Err(e) => tracing::error!("Shard server {} panicked: {}", shard.addr, e),
            }
        }
    }
}

impl Drop for Cluster {
    fn drop(&mut self) {
        for shard in &self.shards {
            shard.handle.abort();
        }
    }
}
