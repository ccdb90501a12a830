//! Test helper utilities
//!
//! - `block`: Builder for creating test Block instances and block chains
//! - `transaction`: Builder for creating test Transaction instances
