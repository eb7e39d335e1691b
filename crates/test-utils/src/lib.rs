//! Shared test utilities for the dggs-grid workspace.
//!
//! This crate provides common testing infrastructure:
//! - Reference grid and domain fixtures
//! - Synthetic coverage sources and band generators
//! - Test logging setup
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Initialize a tracing subscriber for test output.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Filtering honors `RUST_LOG`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
