//! ---
//! pds_section: "01-core-functionality"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Monotonic timing helpers for per-run measurements."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

/// Capture an instant suitable for elapsed-time measurements.
pub fn monotonic_now() -> Instant {
    Instant::now()
}

/// Run `f` and return its result together with the wall-clock time it took.
///
/// The start instant is taken immediately before the call and the end instant
/// immediately after it returns.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = monotonic_now();
    let value = f();
    (value, start.elapsed())
}

/// Render a duration as seconds with a fixed number of decimals.
pub fn format_seconds(duration: Duration, precision: usize) -> String {
    format!("{:.*}", precision, duration.as_secs_f64())
}
