//! Client side of the distributed coordination store
//!
//! The store runs next to the daemon on every node and is reached at
//! `http://<node address>:<port>` (port 2379 by default). The daemon only
//! needs two things from it here: a liveness probe and the member API used to
//! add and remove cluster members.

mod members;

pub use members::{Member, MembershipView};

use async_trait::async_trait;
use http::StatusCode;
use nodekit_bootstrap::CoordinationConfig;
use nodekit_http::{RestClient, RestClientError};
use serde::Deserialize;
use std::net::Ipv6Addr;

#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error("malformed coordination endpoint '{endpoint}': {reason}")]
    MalformedEndpoint { endpoint: String, reason: String },

    #[error("coordination store at {endpoint} is unreachable: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: RestClientError,
    },
}

/// Version report of the coordination store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreVersion {
    #[serde(rename = "etcdserver")]
    pub server: String,
    #[serde(rename = "etcdcluster")]
    pub cluster: String,
}

/// Connected client to the coordination store.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct CoordinationClient {
    endpoint: String,
    rest: RestClient,
}

impl CoordinationClient {
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// # Errors
    /// Returns [`RestClientError`] if the store does not answer `200` with a
    /// version document.
    pub async fn version(&self) -> Result<StoreVersion, RestClientError> {
        self.rest.get_json("/version", StatusCode::OK).await
    }

    /// Member API view sharing this client's transport.
    #[must_use]
    pub fn members(&self) -> MembershipView {
        MembershipView::new(self.rest.clone())
    }
}

/// Builds [`CoordinationClient`]s. Injected into the bootstrapper so tests
/// can observe or replace client construction.
#[async_trait]
pub trait CoordinationConnector: Send + Sync {
    /// Connect to the store reachable at `host`.
    ///
    /// # Errors
    /// Returns [`CoordinationError`] if the endpoint is malformed or the store
    /// cannot be reached.
    async fn connect(&self, host: &str) -> Result<CoordinationClient, CoordinationError>;
}

/// Default connector: `http://<host>:<port>` with an optional `/version` probe.
#[derive(Debug, Clone)]
pub struct CoordinationClientFactory {
    port: u16,
    probe: bool,
}

impl CoordinationClientFactory {
    #[must_use]
    pub fn new(port: u16, probe: bool) -> Self {
        Self { port, probe }
    }

    #[must_use]
    pub fn from_config(cfg: &CoordinationConfig) -> Self {
        Self::new(cfg.port, cfg.probe)
    }

    /// Endpoint URL for `host` on the configured port.
    ///
    /// # Errors
    /// Returns [`CoordinationError::MalformedEndpoint`] for an empty host.
    pub fn endpoint_for(&self, host: &str) -> Result<String, CoordinationError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(CoordinationError::MalformedEndpoint {
                endpoint: format!("http://:{}", self.port),
                reason: "local address is not resolved".to_owned(),
            });
        }

        if host.parse::<Ipv6Addr>().is_ok() {
            Ok(format!("http://[{host}]:{}", self.port))
        } else {
            Ok(format!("http://{host}:{}", self.port))
        }
    }
}

#[async_trait]
impl CoordinationConnector for CoordinationClientFactory {
    async fn connect(&self, host: &str) -> Result<CoordinationClient, CoordinationError> {
        let endpoint = self.endpoint_for(host)?;
        let rest = RestClient::new(&endpoint).map_err(|e| CoordinationError::MalformedEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;
        let client = CoordinationClient { endpoint, rest };

        if self.probe {
            let version =
                client
                    .version()
                    .await
                    .map_err(|source| CoordinationError::Unreachable {
                        endpoint: client.endpoint.clone(),
                        source,
                    })?;
            tracing::info!(
                endpoint = %client.endpoint,
                server = %version.server,
                cluster = %version.cluster,
                "Connected to coordination store"
            );
        }

        Ok(client)
    }
}
