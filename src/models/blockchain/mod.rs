//! Chain data as reported by the node.
//!
//! Blocks, transactions and balances follow the Ethereum JSON-RPC object layout,
//! with alloy primitives for hashes, addresses and 256-bit amounts.

mod block;
mod transaction;

pub mod quantity;

pub use block::{Block, BlockId};
pub use transaction::{AccountBalance, Transaction};
