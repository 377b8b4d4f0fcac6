use crate::context::RuntimeContext;
use crate::coordination::CoordinationError;
use nodekit_bootstrap::StateDirError;
use nodekit_node_info::{AddressError, IdentityError};
use std::sync::Arc;

/// Terminal bootstrap failures.
///
/// Every variant is returned to the entry point, which alone decides whether
/// the process exits. The value is shared by all callers of
/// [`Bootstrapper::init`](crate::Bootstrapper::init), hence `Clone`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BootstrapError {
    #[error("local state directory '{path}' is unusable: {source}")]
    StateDir {
        path: String,
        #[source]
        source: Arc<StateDirError>,
    },

    #[error("cannot resolve local network address: {0}")]
    Address(#[from] AddressError),

    #[error("cannot resolve node identity: {0}")]
    Identity(#[from] IdentityError),

    /// Identity, version and admin API are valid in `context`; it has no
    /// coordination client.
    #[error("coordination client unavailable: {source}")]
    Coordination {
        context: Arc<RuntimeContext>,
        #[source]
        source: Arc<CoordinationError>,
    },

    /// The bootstrap task was cancelled, e.g. by runtime shutdown.
    #[error("bootstrap did not complete: {0}")]
    Interrupted(String),
}

impl BootstrapError {
    /// The partially built context, when bootstrap got as far as step 7.
    #[must_use]
    pub fn degraded_context(&self) -> Option<&Arc<RuntimeContext>> {
        match self {
            BootstrapError::Coordination { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Access to a context field that bootstrap could not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("coordination client is not available on this node")]
    CoordinationUnavailable,
}
