//! Blockchain explorer client library.
//!
//! Resolves ambiguous queries into blocks, accounts and transactions, aggregates
//! network statistics over a window of recent blocks and identifies the network a
//! node serves, all on top of a node's JSON-RPC surface.
//!
//! # Architecture
//!
//! - `models`: Data structures for blocks, transactions, results and configuration
//! - `services`: Node access and the explorer core built on it
//! - `utils`: Logging, metrics and test helpers

pub mod models;
pub mod services;
pub mod utils;
