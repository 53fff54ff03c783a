// src/logging.rs

//! Logging setup for `snapctl` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen in this order:
//! 1. `--log-level`, applied to `snapctl` targets only
//! 2. `SNAPCTL_LOG`, a full `EnvFilter` directive string such as
//!    `snapctl=debug,aws_smithy_runtime=info`
//! 3. `info` for `snapctl`
//!
//! Everything outside `snapctl` (the AWS SDK, hyper, rustls) stays at `warn`
//! unless a `SNAPCTL_LOG` directive says otherwise.
//!
//! Logs go to STDERR; plan output and backup summaries own STDOUT.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "SNAPCTL_LOG";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Resolve the filter from the CLI flag and the raw `SNAPCTL_LOG` value.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(crate_filter(level_directive(level)));
    }

    match env_value.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV_VAR} value '{directives}'")),
        _ => Ok(crate_filter("info")),
    }
}

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,snapctl={level}"))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
