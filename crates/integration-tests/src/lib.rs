//! Integration tests for Reef.
//!
//! The suites in `tests/` drive `reef-commerce` end to end against the
//! in-memory store: full customer lifecycles, observer wiring, and the
//! multi-threaded commit-serialization guarantee.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p reef-integration-tests
//!
//! # With service logs
//! RUST_LOG=reef_commerce=debug cargo test -p reef-integration-tests -- --nocapture
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
