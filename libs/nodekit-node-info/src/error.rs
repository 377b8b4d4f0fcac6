use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors for local address resolution
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddressError {
    #[error("failed to detect local IP address: {0}")]
    DetectFailed(String),

    #[error("address {0} is not routable by peers")]
    Unroutable(IpAddr),
}

/// Errors for node identity loading and persistence
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("failed to access node id file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("node id file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}
