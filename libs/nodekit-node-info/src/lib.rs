#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Node identity and address resolution
//!
//! This library answers two questions about the node the code runs on:
//! - which routable local IP address the node advertises to its peers
//! - which persisted [`NodeId`] identifies the node in the cluster
//!
//! Both are resolved once during bootstrap and cached in the runtime context.

pub mod address;
pub mod error;
pub mod identity;
pub mod model;

pub use address::{AddressResolver, LocalIpResolver, StaticAddressResolver};
pub use error::{AddressError, IdentityError};
pub use identity::{FileIdentityStore, IdentityResolver, IdentityStore, NODE_ID_FILE};
pub use model::NodeId;
