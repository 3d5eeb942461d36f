//! Subscriber setup for applications embedding the client.
//!
//! The client only emits `tracing` events, plus one span per CredHub
//! operation. Applications that have no subscriber of their own can call
//! [`init_tracing`] once at startup. Enabled by the `telemetry` feature.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CLIENT_TARGET: &str = "credhub_client";

/// Where client events go and how much of them.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for everything outside this crate
    pub default_level: String,
    /// Level for `credhub_client` events
    pub client_level: String,
    /// Emit one JSON object per line
    pub json_output: bool,
    /// Log each operation span on close, with its duration
    pub operation_timings: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            client_level: "debug".to_string(),
            json_output: false,
            operation_timings: false,
        }
    }
}

impl TracingConfig {
    /// Set the level for events outside this crate.
    #[must_use]
    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    /// Set the level for client events.
    #[must_use]
    pub fn with_client_level(mut self, level: impl Into<String>) -> Self {
        self.client_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Log how long each CredHub operation took.
    #[must_use]
    pub const fn with_operation_timings(mut self) -> Self {
        self.operation_timings = true;
        self
    }

    /// Filter directives, e.g. `info,credhub_client=debug`.
    #[must_use]
    pub fn directives(&self) -> String {
        format!("{},{CLIENT_TARGET}={}", self.default_level, self.client_level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.operation_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured levels.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));
    let layer = tracing_subscriber::fmt::layer().with_span_events(config.span_events());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_output {
        registry.with(layer.json()).try_init().is_ok()
    } else {
        registry.with(layer).try_init().is_ok()
    }
}
