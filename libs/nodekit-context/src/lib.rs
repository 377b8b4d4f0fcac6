#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Runtime context of a storage node
//!
//! [`Bootstrapper::init`] builds the [`RuntimeContext`] exactly once per
//! process: state directory, local address, node identity, operating
//! version, admin API and transaction framework handles, store namespace and
//! the coordination store client, strictly in that order. Subsystems receive
//! the resulting `Arc<RuntimeContext>` instead of reading globals.

pub mod admin;
pub mod bootstrap;
pub mod context;
pub mod coordination;
pub mod error;
pub mod store;
pub mod txn;
pub mod version;

pub use admin::{AdminApi, VersionInfo};
pub use bootstrap::{BootstrapDeps, Bootstrapper};
pub use context::{CoordinationProcess, RuntimeContext};
pub use coordination::{
    CoordinationClient, CoordinationClientFactory, CoordinationConnector, CoordinationError,
    Member, MembershipView, StoreVersion,
};
pub use error::{BootstrapError, ContextError};
pub use store::StoreNamespace;
pub use txn::{TxnFramework, TxnId};
pub use version::{API_VERSION, MAX_OP_VERSION, MIN_OP_VERSION, OpVersion, negotiate_op_version};
