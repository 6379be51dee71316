//! Tracing setup for the galaxyctl CLI
//!
//! Usage:
//!   galaxyctl register ...                # progress lines at info level
//!   galaxyctl --debug register ...        # debug logging, with targets
//!   galaxyctl --quiet register ...        # warnings and errors only
//!   RUST_LOG=galaxyctl_core=debug ...     # fine-grained log control
//!
//! RUST_LOG, when set, wins over both flags.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to debug level
    pub debug: bool,
    /// Default to warn level (ignored when `debug` is set)
    pub quiet: bool,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        match (self.debug, self.quiet) {
            (true, _) => "debug",
            (false, true) => "warn",
            (false, false) => "info",
        }
    }
}

/// Initialize console tracing
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
