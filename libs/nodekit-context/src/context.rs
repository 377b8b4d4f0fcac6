use crate::admin::AdminApi;
use crate::coordination::{CoordinationClient, MembershipView};
use crate::error::ContextError;
use crate::store::StoreNamespace;
use crate::txn::TxnFramework;
use crate::version::OpVersion;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use nodekit_node_info::NodeId;
use std::net::IpAddr;
use std::sync::Arc;

/// Non-owning reference to the coordination store process running on this
/// node. Whoever spawned the process owns it; the context only records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinationProcess {
    pid: u32,
    recorded_at: DateTime<Utc>,
}

impl CoordinationProcess {
    #[must_use]
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            recorded_at: Utc::now(),
        }
    }

    /// `None` if the child has already been reaped.
    #[must_use]
    pub fn from_child(child: &tokio::process::Child) -> Option<Self> {
        child.id().map(Self::new)
    }

    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Process-wide runtime context of the node.
///
/// Built once by [`Bootstrapper`](crate::Bootstrapper) and shared as
/// `Arc<RuntimeContext>`. All fields are fixed after bootstrap except the
/// coordination process slot, which is swapped atomically.
pub struct RuntimeContext {
    pub(crate) node_id: NodeId,
    pub(crate) op_version: OpVersion,
    pub(crate) local_address: IpAddr,
    pub(crate) local_host: String,
    pub(crate) admin: AdminApi,
    pub(crate) txn: Arc<TxnFramework>,
    pub(crate) store: StoreNamespace,
    pub(crate) coordination: Option<CoordinationClient>,
    pub(crate) coordination_process: ArcSwapOption<CoordinationProcess>,
}

impl std::fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("node_id", &self.node_id)
            .field("op_version", &self.op_version)
            .field("local_address", &self.local_address)
            .field("store_root", &self.store.root())
            .field(
                "coordination",
                &self.coordination.as_ref().map(CoordinationClient::endpoint),
            )
            .finish_non_exhaustive()
    }
}

impl RuntimeContext {
    #[inline]
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    #[inline]
    #[must_use]
    pub fn op_version(&self) -> OpVersion {
        self.op_version
    }

    #[must_use]
    pub fn local_address(&self) -> IpAddr {
        self.local_address
    }

    /// The resolved local address in string form, as peers dial it.
    #[must_use]
    pub fn local_host(&self) -> &str {
        &self.local_host
    }

    #[must_use]
    pub fn admin_api(&self) -> &AdminApi {
        &self.admin
    }

    #[must_use]
    pub fn txn_framework(&self) -> &Arc<TxnFramework> {
        &self.txn
    }

    #[must_use]
    pub fn store(&self) -> &StoreNamespace {
        &self.store
    }

    /// # Errors
    /// Returns [`ContextError::CoordinationUnavailable`] when bootstrap could
    /// not connect to the coordination store.
    pub fn coordination_client(&self) -> Result<&CoordinationClient, ContextError> {
        self.coordination
            .as_ref()
            .ok_or(ContextError::CoordinationUnavailable)
    }

    /// Member API over the bootstrap-time coordination client.
    ///
    /// # Errors
    /// Returns [`ContextError::CoordinationUnavailable`] when there is no client.
    pub fn membership(&self) -> Result<MembershipView, ContextError> {
        self.coordination_client().map(CoordinationClient::members)
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.coordination.is_none()
    }

    /// Record (or clear) the coordination store process.
    pub fn set_coordination_process(&self, process: Option<CoordinationProcess>) {
        match &process {
            Some(p) => tracing::debug!(pid = p.pid(), "Recorded coordination store process"),
            None => tracing::debug!("Cleared coordination store process"),
        }
        self.coordination_process.store(process.map(Arc::new));
    }

    #[must_use]
    pub fn coordination_process(&self) -> Option<Arc<CoordinationProcess>> {
        self.coordination_process.load_full()
    }
}
