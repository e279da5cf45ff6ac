use super::{DispatchReport, RouterConfig};
use crate::error::RouteError;
use crate::hashring::HashRing;
use crate::storage::protocol::KeyValue;

use reqwest::StatusCode;

/// Client-side router for the sharded store.
///
/// Owns the hash ring describing the cluster and an HTTP client. Every key is routed
/// independently; the servers never see the ring, so all clients must be built from the
/// same node set and strategy to agree on where a key lives.
pub struct Router {
    ring: Box<dyn HashRing>,
    http_client: reqwest::Client,
    config: RouterConfig,
}

impl Router {
    /// Builds a router over `nodes`. Identifiers are normalized to base URLs first.
    pub fn new<I, S>(nodes: I, config: RouterConfig) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = config.strategy.build();
        for node in nodes {
            ring.add(&normalize_node(node.as_ref(), &config.default_host))?;
        }

        tracing::info!(
            "Router: {} strategy over {} nodes",
            config.strategy,
            ring.len()
        );

        Ok(Self {
            ring,
            http_client: reqwest::Client::new(),
            config,
        })
    }

    /// Base URLs of the registered nodes, in ring order.
    pub fn nodes(&self) -> Vec<String> {
        self.ring.nodes().iter().map(|node| node.id.clone()).collect()
    }

    pub fn add_node(&mut self, node: &str) -> Result<(), RouteError> {
        let node = normalize_node(node, &self.config.default_host);
        self.ring.add(&node)?;
        tracing::info!("Router: added node {}", node);
        Ok(())
    }

    pub fn remove_node(&mut self, node: &str) -> Result<(), RouteError> {
        let node = normalize_node(node, &self.config.default_host);
        self.ring.remove(&node)?;
        tracing::info!("Router: removed node {}", node);
        Ok(())
    }

    /// Returns the base URL of the node owning `key`.
    pub fn route(&self, key: &str) -> Result<&str, RouteError> {
        Ok(self.ring.get(key)?)
    }

    /// Sends `PUT {node}/{key}/{value}` and returns the status the node answered with.
    ///
    /// Both segments are percent-encoded, so a key like `1?x` reaches the node as one
    /// segment and is rejected there instead of being cut at the `?`.
    pub async fn dispatch(
        &self,
        node: &str,
        key: &str,
        value: &str,
    ) -> Result<StatusCode, RouteError> {
        let url = format!(
            "{}/{}/{}",
            node,
            urlencoding::encode(key),
            urlencoding::encode(value)
        );

        let response = self
            .http_client
            .put(url)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|source| RouteError::Network {
                node: node.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::info!("PUT {}={} on {}: {}", key, value, node, status);

        match response.text().await {
            Ok(body) if !body.is_empty() => tracing::debug!("Response body: {}", body),
            Ok(_) => {}
            Err(e) => tracing::debug!("Failed to read response body: {}", e),
        }

        Ok(status)
    }

    /// Routes `key` and stores `value` on its owner.
    ///
    /// Returns the owner's base URL. Any non-2xx answer is an error.
    pub async fn put(&self, key: &str, value: &str) -> Result<String, RouteError> {
        let node = self.route(key)?.to_string();
        tracing::info!("Sending {}->{} to {}", key, value, node);

        let status = self.dispatch(&node, key, value).await?;
        if !status.is_success() {
            return Err(RouteError::UnexpectedStatus { node, status });
        }
        Ok(node)
    }

    /// Stores every pair, one request at a time.
    ///
    /// A failing pair is logged and recorded in its report; the remaining pairs are still
    /// sent.
    pub async fn put_batch<K, V>(&self, pairs: &[(K, V)]) -> Vec<DispatchReport>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut reports = Vec::with_capacity(pairs.len());

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let outcome = self.put(key, value).await;

            if let Err(e) = &outcome {
                tracing::error!("Failed to store {}->{}: {}", key, value, e);
            }

            reports.push(DispatchReport {
                key: key.to_string(),
                value: value.to_string(),
                outcome,
            });
        }

        let failed = reports.iter().filter(|report| !report.is_success()).count();
        if failed > 0 {
            tracing::warn!("{} of {} writes failed", failed, reports.len());
        }

        reports
    }

    /// Reads `key` straight from `node` with `GET {node}/{key}`.
    ///
    /// `Ok(None)` when the node answers 404.
    pub async fn fetch(&self, node: &str, key: &str) -> Result<Option<String>, RouteError> {
        let url = format!("{}/{}", node, urlencoding::encode(key));

        let response = self
            .http_client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|source| RouteError::Network {
                node: node.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RouteError::UnexpectedStatus {
                node: node.to_string(),
                status,
            });
        }

        let entry: KeyValue = response.json().await.map_err(|source| RouteError::Decode {
            node: node.to_string(),
            source,
        })?;
        Ok(Some(entry.value))
    }

    /// Routes `key` and reads it from its owner.
    pub async fn get(&self, key: &str) -> Result<Option<String>, RouteError> {
        let node = self.route(key)?;
        self.fetch(node, key).await
    }
}

/// Turns a node identifier into a base URL.
///
/// `":8001"` becomes `http://{default_host}:8001`, a bare `host:port` gets an `http://`
/// scheme, and trailing slashes are dropped.
pub fn normalize_node(identifier: &str, default_host: &str) -> String {
    let trimmed = identifier.trim().trim_end_matches('/');

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.starts_with(':') {
        format!("http://{}{}", default_host, trimmed)
    } else {
        format!("http://{}", trimmed)
    }
}
