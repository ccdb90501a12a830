//! Node access.
//!
//! Provides the node provider abstraction the explorer core depends on and its
//! concrete pieces:
//!
//! - `NodeProvider` trait and block subscriptions
//! - EVM provider over JSON-RPC
//! - Network transport implementations
//! - Persisted endpoint preference

mod provider;
mod providers;
mod storage;
mod transports;

pub use provider::{BlockNotification, BlockSubscription, NodeProvider};
pub use providers::{error_codes, is_not_found_error, EvmNodeProvider, EvmProviderError};
pub use storage::{EndpointStore, FileEndpointStore};
pub use transports::{BlockchainTransport, HttpTransportClient, TransportError};
