#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! REST client for node administrative APIs
//!
//! Nodes talk to each other's administrative API (and to the coordination
//! store's HTTP API) through [`RestClient`]. Every call declares the status
//! code it expects; any other status is handed back to the caller as an
//! [`UnexpectedStatusError`] carrying the raw response body.
//!
//! The client never retries and never applies a timeout of its own. Callers
//! that need a deadline wrap the call in `tokio::time::timeout`.
//!
//! # Example
//!
//! ```ignore
//! use nodekit_http::RestClient;
//! use http::StatusCode;
//!
//! let peer = RestClient::new("http://10.0.0.7:24007")?;
//! let version: serde_json::Value = peer.get_json("/version", StatusCode::OK).await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::{RestClientError, UnexpectedStatusError};
