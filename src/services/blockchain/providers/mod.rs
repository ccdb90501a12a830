//! Node provider implementations.
//!
//! - EVM provider speaking the Ethereum JSON-RPC API

mod evm {
	pub mod error;
	pub mod provider;
}

pub use evm::error::{error_codes, is_not_found_error, EvmProviderError};
pub use evm::provider::EvmNodeProvider;
