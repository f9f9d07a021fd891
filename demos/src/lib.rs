// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Understory demos.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber that honours `RUST_LOG` (default: `understory_join=debug`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("understory_join=debug"));
    // A subscriber may already be installed when demos are run from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
