//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; they are separate from the
//! command's own output. `RUST_LOG` takes precedence over the default
//! directive passed by the caller.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::UtilError;
use crate::Result;

/// Environment variable consulted for the filter directive.
pub const LOG_ENV: &str = "RUST_LOG";

/// Pick the filter directive: `RUST_LOG` if set and non-empty, else `default`.
pub fn filter_directive(env_value: Option<&str>, default: &str) -> String {
    match env_value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Build an `EnvFilter` from a directive, reporting bad directives.
pub fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| UtilError::LogFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global stderr subscriber.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init(default: &str) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), default);
    let filter = build_filter(&directive)?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    Ok(())
}
