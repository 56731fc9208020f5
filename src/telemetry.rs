//! Tracing targets and an opt-in subscriber for hosts embedding `chart-geom`.
//!
//! Per-frame events go to [`FRAME_TARGET`] and hover transitions to
//! [`HOVER_TARGET`], so a host can raise geometry logging without drowning in
//! its own crate's output.

/// Target of the per-frame geometry summary events.
pub const FRAME_TARGET: &str = "chart_geom::frame";
/// Target of hover state transitions.
pub const HOVER_TARGET: &str = "chart_geom::hover";
/// Filter used when `RUST_LOG` is unset: host crates at `warn`, this crate at `info`.
pub const DEFAULT_FILTER: &str = "warn,chart_geom=info";

/// Filter directives that additionally turn on per-frame and hover events.
#[must_use]
pub fn geometry_debug_filter() -> String {
    format!("{DEFAULT_FILTER},{FRAME_TARGET}=debug,{HOVER_TARGET}=debug")
}

/// Initializes a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// `RUST_LOG` wins over [`DEFAULT_FILTER`]. Returns `false` when the feature is
/// disabled or a global subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with explicit fallback `directives`.
#[must_use]
pub fn init_tracing_with(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}
