//! Core domain models: search results, block windows, statistics and network identity.

mod network;
mod search;
mod stats;
mod window;

pub use network::{
	ChainEntry, ChainRegistry, NetworkIdentity, DAO_FORK_BLOCK_HEIGHT, KNOWN_FORK_BLOCK_HASHES,
};
pub use search::{LookupKind, SearchResult};
pub use stats::SystemStats;
pub use window::BlockWindow;
