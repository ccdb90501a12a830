//! Explorer core.
//!
//! Builds the explorer operations on top of a node provider:
//!
//! - Query resolution across block, account and transaction lookups
//! - Network identification by fork block hash
//! - Statistics aggregation over a window of recent blocks
//! - The client composing them, with connection strategies and a window cache

mod client;
mod connection;
mod deadline;
mod error;
mod identifier;
mod resolver;
mod stats;

pub use client::{Client, WatchHandle};
pub use connection::{establish_provider, ConnectionStrategy};
pub use deadline::{bounded, with_timeout};
pub use error::ExplorerError;
pub use identifier::ChainIdentifier;
pub use resolver::QueryResolver;
pub use stats::{
	average_block_time, average_difficulty, block_times, hash_rate, summarize, StatsAggregator,
};
