//! Utility modules for common functionality.
//!
//! - logging: Logging setup and shared error context
//! - metrics: Prometheus metrics
//! - tests: Builders for test data

pub mod logging;
pub mod metrics;
