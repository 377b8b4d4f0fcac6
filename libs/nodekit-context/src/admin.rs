//! Administrative API handle
//!
//! The admin surface itself lives with the subsystems that register routes on
//! it; the handle only carries the base router with the node's `/version`
//! endpoint and knows how to serve it.

use crate::version::{API_VERSION, DAEMON_VERSION, OpVersion};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use nodekit_node_info::NodeId;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body of `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub node_id: NodeId,
    pub op_version: OpVersion,
    pub api_version: u32,
    pub version: String,
}

#[derive(Clone)]
pub struct AdminApi {
    info: Arc<VersionInfo>,
    router: Router,
}

impl std::fmt::Debug for AdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApi")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl AdminApi {
    #[must_use]
    pub fn new(node_id: NodeId, op_version: OpVersion) -> Self {
        let info = Arc::new(VersionInfo {
            node_id,
            op_version,
            api_version: API_VERSION,
            version: DAEMON_VERSION.to_owned(),
        });
        let router = Router::new()
            .route("/version", get(get_version))
            .with_state(Arc::clone(&info));

        Self { info, router }
    }

    #[must_use]
    pub fn version_info(&self) -> &VersionInfo {
        &self.info
    }

    /// Base router; subsystems merge their routes into a clone of it.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve the admin API until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns an I/O error if the server fails while accepting connections.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "Admin API listening");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn get_version(State(info): State<Arc<VersionInfo>>) -> Json<VersionInfo> {
    Json(VersionInfo::clone(&info))
}
