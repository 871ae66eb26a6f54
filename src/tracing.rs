//! Process-wide structured logging setup (stderr) for the binary.
//!
//! This is separate from the daily/error file sinks in [`crate::logger`]: this
//! module wires up `tracing` for operational visibility (what the process is
//! doing right now), while the file sinks persist the hit-ratio and error
//! history the spec calls for.

use tracing_subscriber::{EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber with formatted stderr output.
///
/// Honors `RUST_LOG` if set, otherwise defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
