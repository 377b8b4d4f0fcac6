use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest operating version this build supports
pub const MAX_OP_VERSION: u32 = 40000;

/// Lowest valid operating version
pub const MIN_OP_VERSION: u32 = 1;

/// Version of the administrative REST API
pub const API_VERSION: u32 = 1;

/// Daemon release string reported by the admin API
pub const DAEMON_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Operating version the node runs at, always in
/// `MIN_OP_VERSION..=MAX_OP_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OpVersion(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("op-version {0} outside supported range {MIN_OP_VERSION}..={MAX_OP_VERSION}")]
pub struct OpVersionOutOfRange(pub u32);

impl OpVersion {
    pub const MAX: OpVersion = OpVersion(MAX_OP_VERSION);

    /// # Errors
    /// Returns [`OpVersionOutOfRange`] for values outside the supported range.
    pub fn new(value: u32) -> Result<Self, OpVersionOutOfRange> {
        if (MIN_OP_VERSION..=MAX_OP_VERSION).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OpVersionOutOfRange(value))
        }
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for OpVersion {
    type Error = OpVersionOutOfRange;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OpVersion> for u32 {
    fn from(v: OpVersion) -> Self {
        v.0
    }
}

impl fmt::Display for OpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pick the operating version for this node.
///
/// Always the maximum this build supports. This is a known limitation rather
/// than the intended end state: the node should run at the highest version
/// every current cluster member supports.
// TODO: negotiate the minimum MAX_OP_VERSION across members once peers report it
#[must_use]
pub fn negotiate_op_version() -> OpVersion {
    OpVersion::MAX
}
