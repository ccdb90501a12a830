//! Domain models and data structures.
//!
//! - `blockchain`: blocks, transactions and balances as reported by the node
//! - `config`: configuration loading and validation
//! - `core`: search results, block windows, statistics and network identity

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::{quantity, AccountBalance, Block, BlockId, Transaction};

// Re-export core types
pub use self::core::{
	BlockWindow, ChainEntry, ChainRegistry, LookupKind, NetworkIdentity, SearchResult,
	SystemStats, DAO_FORK_BLOCK_HEIGHT, KNOWN_FORK_BLOCK_HASHES,
};

// Re-export config types
pub use config::{validate_rpc_url, ClientConfig, ConfigError, ConfigLoader, ExplorerSettings};
