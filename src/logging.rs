//! Tracing subscriber setup.
//!
//! Logs go to stderr; stdout carries only the transcript.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither an explicit directive nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: explicit directive, else `RUST_LOG`, else [`DEFAULT_FILTER`].
///
/// An unparsable explicit directive falls through to the next source.
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Returns false when a subscriber was already installed (tests install
/// their own, and a second call is harmless).
pub fn init_tracing(directive: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .is_ok()
}
