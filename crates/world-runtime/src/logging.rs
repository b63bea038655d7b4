//! Structured logging setup.
//!
//! `RUST_LOG` takes precedence over the configured level so a single run can
//! be made noisier without touching config.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RuntimeConfig;

/// Install the global `tracing` subscriber.
pub fn init_logging(config: &RuntimeConfig) -> anyhow::Result<()> {
    let filter = build_filter(config)?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.json_logs {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install JSON subscriber: {e}"))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
    }
}

fn build_filter(config: &RuntimeConfig) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.log_level)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config() {
        let config = RuntimeConfig {
            log_level: "world_runtime=debug,shared_bus=trace".to_string(),
            ..RuntimeConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
