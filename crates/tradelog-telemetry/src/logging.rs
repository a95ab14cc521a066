//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,tradelog=debug,tower_http=info,sqlx=warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// One JSON object per event, with the span list.
    Json,
}

impl LogFormat {
    /// Format selected by the process environment.
    pub fn from_env() -> Self {
        Self::detect(
            std::env::var("RUST_ENV").ok().as_deref(),
            std::env::var("LOG_FORMAT").ok().as_deref(),
        )
    }

    /// `LOG_FORMAT` wins when set; otherwise JSON iff `RUST_ENV=production`.
    fn detect(rust_env: Option<&str>, log_format: Option<&str>) -> Self {
        match log_format.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ if rust_env == Some("production") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initialize structured logging in the format chosen by the environment.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> TelemetryResult<()> {
    init_logging_with(LogFormat::from_env())
}

/// Initialize structured logging in an explicit format.
pub fn init_logging_with(format: LogFormat) -> TelemetryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
