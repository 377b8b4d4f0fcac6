use crate::admin::AdminApi;
use crate::context::RuntimeContext;
use crate::coordination::{CoordinationClientFactory, CoordinationConnector};
use crate::error::BootstrapError;
use crate::store::StoreNamespace;
use crate::txn::TxnFramework;
use crate::version::negotiate_op_version;
use arc_swap::ArcSwapOption;
use nodekit_bootstrap::{AppConfig, StateDirError, resolve_state_dir};
use nodekit_node_info::{
    AddressResolver, FileIdentityStore, IdentityResolver, IdentityStore, LocalIpResolver,
    StaticAddressResolver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinError;

type Outcome = Result<Arc<RuntimeContext>, BootstrapError>;

/// Collaborators the bootstrap sequence calls out to.
pub struct BootstrapDeps {
    pub address: Arc<dyn AddressResolver>,
    pub identity: Arc<dyn IdentityStore>,
    pub coordination: Arc<dyn CoordinationConnector>,
}

/// Builds the node's [`RuntimeContext`] exactly once.
///
/// The sequence runs in a spawned task that owns its own handle to the
/// bootstrap state, so it completes even if every caller of
/// [`init`](Self::init) is dropped midway (for example by a
/// `tokio::time::timeout`). Concurrent and later callers wait on the same
/// cell and read the published outcome.
pub struct Bootstrapper {
    shared: Arc<Shared>,
}

struct Shared {
    state_dir: PathBuf,
    store_prefix: String,
    deps: BootstrapDeps,
    outcome: OnceCell<Outcome>,
}

impl Bootstrapper {
    #[must_use]
    pub fn new(state_dir: PathBuf, store_prefix: impl Into<String>, deps: BootstrapDeps) -> Self {
        Self {
            shared: Arc::new(Shared {
                state_dir,
                store_prefix: store_prefix.into(),
                deps,
                outcome: OnceCell::new(),
            }),
        }
    }

    /// Wire the default collaborators from configuration.
    ///
    /// Nothing is touched on disk or on the network here.
    ///
    /// # Errors
    /// Returns [`BootstrapError::StateDir`] if `node.local_state_dir` cannot
    /// be normalized to an absolute path.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, BootstrapError> {
        let raw = &cfg.node.local_state_dir;
        let state_dir = resolve_state_dir(raw, false).map_err(|e| BootstrapError::StateDir {
            path: raw.clone(),
            source: Arc::new(e),
        })?;

        let address: Arc<dyn AddressResolver> = match cfg.node.advertise_address {
            Some(ip) => Arc::new(StaticAddressResolver::new(ip)),
            None => Arc::new(LocalIpResolver),
        };
        let deps = BootstrapDeps {
            address,
            identity: Arc::new(FileIdentityStore::in_dir(&state_dir)),
            coordination: Arc::new(CoordinationClientFactory::from_config(&cfg.coordination)),
        };

        Ok(Self::new(state_dir, cfg.coordination.prefix.clone(), deps))
    }

    /// Run the bootstrap sequence once and return its outcome.
    ///
    /// Every call, concurrent or later, returns the same outcome: the same
    /// `Arc<RuntimeContext>` or the same error. Cancelling a call does not
    /// cancel the sequence.
    ///
    /// # Errors
    /// Returns the [`BootstrapError`] of the single bootstrap run.
    pub async fn init(&self) -> Result<Arc<RuntimeContext>, BootstrapError> {
        if let Some(outcome) = self.shared.outcome.get() {
            return outcome.clone();
        }

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            shared
                .outcome
                .get_or_init(|| shared.run())
                .await
                .clone()
        });
        task.await.map_err(interrupted)?
    }

    /// The fully bootstrapped context, if `init` has completed successfully.
    #[must_use]
    pub fn context(&self) -> Option<Arc<RuntimeContext>> {
        self.shared.outcome.get()?.as_ref().ok().cloned()
    }
}

/// A panic inside the sequence is re-raised in the caller.
fn interrupted(err: JoinError) -> BootstrapError {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    tracing::error!(error = %err, "Bootstrap task was cancelled");
    BootstrapError::Interrupted(err.to_string())
}

impl Shared {
    async fn run(&self) -> Outcome {
        tracing::debug!(
            state_dir = %self.state_dir.display(),
            "Initializing node runtime context"
        );

        let state_dir = self.state_dir.clone();
        tokio::task::spawn_blocking(move || std::fs::create_dir_all(state_dir))
            .await
            .map_err(interrupted)?
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    state_dir = %self.state_dir.display(),
                    "Cannot create local state directory"
                );
                BootstrapError::StateDir {
                    path: self.state_dir.display().to_string(),
                    source: Arc::new(StateDirError::Io(e)),
                }
            })?;

        let local_address = self.deps.address.resolve().inspect_err(|e| {
            tracing::error!(error = %e, "Could not resolve local IP address");
        })?;
        let local_host = local_address.to_string();

        let identity = IdentityResolver::new(Arc::clone(&self.deps.identity));
        let node_id = tokio::task::spawn_blocking(move || identity.resolve())
            .await
            .map_err(interrupted)?
            .inspect_err(|e| tracing::error!(error = %e, "Could not resolve node id"))?;

        let op_version = negotiate_op_version();
        tracing::info!(%node_id, %local_address, %op_version, "Node identity resolved");

        let admin = AdminApi::new(node_id, op_version);
        let txn = Arc::new(TxnFramework::new(node_id));

        let store = StoreNamespace::new(&self.store_prefix, node_id);
        tracing::debug!(node_key = store.node_key(), "Store namespace initialized");

        let (coordination, failure) = match self.deps.coordination.connect(&local_host).await {
            Ok(client) => (Some(client), None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize coordination client");
                (None, Some(e))
            }
        };

        let context = Arc::new(RuntimeContext {
            node_id,
            op_version,
            local_address,
            local_host,
            admin,
            txn,
            store,
            coordination,
            coordination_process: ArcSwapOption::empty(),
        });

        match failure {
            Some(e) => Err(BootstrapError::Coordination {
                context,
                source: Arc::new(e),
            }),
            None => {
                tracing::debug!("Initialized node runtime context");
                Ok(context)
            }
        }
    }
}
