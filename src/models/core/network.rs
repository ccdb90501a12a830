use alloy_primitives::{b256, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Height of the DAO fork, where Ethereum and Ethereum Classic diverge
pub const DAO_FORK_BLOCK_HEIGHT: u64 = 1_920_000;

/// Hashes of the block at [`DAO_FORK_BLOCK_HEIGHT`] on known chains
pub const KNOWN_FORK_BLOCK_HASHES: &[(B256, &str)] = &[
	(
		b256!("4985f5ca3d2afbec36529aa96f74de3cc10a2a4a6c44f2157a57d2c6059a11bb"),
		"Ethereum",
	),
	(
		b256!("94365e3a8c0b35089c1d1195081fe7489b528a84b22199c916180db8b28ade7f"),
		"Ethereum Classic",
	),
];

/// Which chain the connected node serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "name", rename_all = "lowercase")]
pub enum NetworkIdentity {
	/// Fork block hash matched a registry entry
	Known(String),
	/// Fork block hash matched nothing (or the chain is shorter than the fork height)
	Unknown,
}

impl NetworkIdentity {
	pub fn is_known(&self) -> bool {
		matches!(self, NetworkIdentity::Known(_))
	}

	pub fn name(&self) -> Option<&str> {
		match self {
			NetworkIdentity::Known(name) => Some(name),
			NetworkIdentity::Unknown => None,
		}
	}
}

impl fmt::Display for NetworkIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NetworkIdentity::Known(name) => write!(f, "{}", name),
			NetworkIdentity::Unknown => write!(f, "unknown"),
		}
	}
}

/// A registry entry mapping a fork block hash to a chain name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
	pub hash: B256,
	pub name: String,
}

impl ChainEntry {
	pub fn new(hash: B256, name: impl Into<String>) -> Self {
		Self {
			hash,
			name: name.into(),
		}
	}
}

/// Static table identifying chains by the hash of one fork block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRegistry {
	/// Height of the fingerprint block
	pub fork_height: u64,
	pub entries: Vec<ChainEntry>,
}

impl ChainRegistry {
	/// Creates a registry from explicit entries
	pub fn new(fork_height: u64, entries: Vec<ChainEntry>) -> Self {
		Self {
			fork_height,
			entries,
		}
	}

	/// Returns a registry with `extra` entries appended
	///
	/// Extra entries are consulted after the existing ones.
	pub fn with_entries(mut self, extra: impl IntoIterator<Item = ChainEntry>) -> Self {
		self.entries.extend(extra);
		self
	}

	/// Finds the chain name for a fork block hash
	pub fn lookup(&self, hash: &B256) -> Option<&str> {
		self.entries
			.iter()
			.find(|entry| entry.hash == *hash)
			.map(|entry| entry.name.as_str())
	}

	/// Maps a fork block hash to a network identity
	pub fn identify(&self, hash: &B256) -> NetworkIdentity {
		match self.lookup(hash) {
			Some(name) => NetworkIdentity::Known(name.to_string()),
			None => NetworkIdentity::Unknown,
		}
	}
}

impl Default for ChainRegistry {
	fn default() -> Self {
		Self::new(
			DAO_FORK_BLOCK_HEIGHT,
			KNOWN_FORK_BLOCK_HASHES
				.iter()
				.map(|(hash, name)| ChainEntry::new(*hash, *name))
				.collect(),
		)
	}
}
