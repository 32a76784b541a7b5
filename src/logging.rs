//! Diagnostic logging for the shell binary.
//!
//! Events go to stderr through `tracing-subscriber`, so they never mix with command output.

use anyhow::{Context, anyhow};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `--log` nor `YSH_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the event filter from a directive string such as `debug` or `tree_vfs=trace`.
pub fn build_env_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    let directives = if directives.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        directives
    };
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter '{directives}'"))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(directives: &str) -> anyhow::Result<()> {
    let filter = build_env_filter(directives)?;
    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
