//! Core services implementing the explorer.
//!
//! - blockchain: node provider abstraction, EVM provider and transports
//! - explorer: query resolution, network identification, statistics and the client

pub mod blockchain;
pub mod explorer;
