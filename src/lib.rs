//! Rust client library for the Aeternity Epoch node HTTP API.
//!
//! Public API layers:
//! - [`ApiClient`]/[`BlockingApiClient`]: generic JSON HTTP clients.
//! - [`EpochClient`]/[`BlockingEpochClient`]: typed per-operation clients
//!   backed by the static [`operations`] catalog.
//! - [`models`]: one serde type per schema-defined record, including the
//!   discriminator-driven [`models::SingleTxHashOrObject`] union.
//! - [`ClientError`]: unified error type used by all clients.

mod blocking_client;
mod client;
mod epoch_client;
mod error;
pub mod models;
pub mod operations;

/// Generic blocking JSON REST client.
pub use blocking_client::BlockingApiClient;
/// Generic async JSON REST client and response metadata wrapper.
pub use client::{ApiClient, ApiResponse};
/// Typed operation clients.
///
/// See [`BlockingEpochClient`] for the synchronous variant.
pub use epoch_client::{AccountTxsParams, BlockingEpochClient, EpochClient, TxEncoding};
/// Error type returned by all client operations.
pub use error::ClientError;
/// Operation catalog entry, re-exported for callers inspecting the catalog.
pub use operations::{CollectionFormat, OperationDefinition, QueryParamDef};
