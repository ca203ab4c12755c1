/*!
 * Structured Tracing
 * Subscriber setup for the allocator's tracing events
 *
 * Environment variables:
 * - RUST_LOG: log filter (default: info)
 * - POOLMEM_TRACE_JSON: JSON output when "1" or "true"
 */

use crate::core::limits::ENV_TRACE_JSON;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Output format for the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Compact,
    Json,
}

impl TraceFormat {
    /// Format selected by `POOLMEM_TRACE_JSON`
    pub fn from_env() -> Self {
        match std::env::var(ENV_TRACE_JSON) {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => TraceFormat::Json,
            _ => TraceFormat::Compact,
        }
    }
}

/// Install the global subscriber using the format from the environment
///
/// Returns `false` when a global subscriber was already installed; calling
/// this more than once is harmless.
pub fn init_tracing() -> bool {
    init_tracing_with(TraceFormat::from_env())
}

/// Install the global subscriber with an explicit format
pub fn init_tracing_with(format: TraceFormat) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        TraceFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok(),
        TraceFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        info!(?format, "Structured tracing initialized");
    }
    installed
}
