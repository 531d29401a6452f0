//! Optional timing instrumentation for analysis requests.
//!
//! A [`TimingGuard`] measures a scoped stage (detection, embedding, report
//! assembly) and logs the elapsed time when dropped. Guards only emit output
//! when telemetry has been switched on via [`configure`] and the global log
//! filter admits the requested level, so idle overhead is a couple of atomic
//! loads.

use std::{
    borrow::Cow,
    sync::atomic::{AtomicU8, Ordering},
    time::{Duration, Instant},
};

use log::{Level, LevelFilter, log, log_enabled};

/// Log target used for all telemetry output.
///
/// Filter with `RUST_LOG=sightkit::telemetry=debug` to see timing lines
/// without raising the level of the rest of the crate.
pub const TELEMETRY_TARGET: &str = "sightkit::telemetry";

// Packed state: 0 means disabled, otherwise the highest admitted level index.
static TELEMETRY_STATE: AtomicU8 = AtomicU8::new(0);

/// RAII guard that logs the elapsed time of a stage when dropped.
///
/// Most callers construct guards through [`timing_guard`] or
/// [`timing_guard_if`] rather than using this type directly.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    started: Instant,
    armed: bool,
}

impl TimingGuard {
    fn new(label: Cow<'static, str>, level: Level, armed: bool) -> Self {
        Self {
            label,
            level,
            started: Instant::now(),
            armed,
        }
    }

    /// Returns `true` when dropping this guard will emit a log line.
    pub fn is_active(&self) -> bool {
        self.armed
    }

    /// Elapsed time since the guard was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Consumes the guard, returning the elapsed time without logging.
    pub fn finish(mut self) -> Duration {
        self.armed = false;
        self.started.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.armed {
            log!(
                target: TELEMETRY_TARGET,
                self.level,
                "{} took {:.2?}",
                self.label,
                self.started.elapsed()
            );
        }
    }
}

/// Creates a guard that logs at `level` whenever telemetry admits it.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    timing_guard_if(label, level, true)
}

/// Creates a guard gated on an additional caller-supplied flag.
///
/// The guard only arms when the flag is set, telemetry is configured to admit
/// `level`, and the global log filter would actually print it.
pub fn timing_guard_if(
    label: impl Into<Cow<'static, str>>,
    level: Level,
    enabled: bool,
) -> TimingGuard {
    let armed =
        enabled && telemetry_allows(level) && log_enabled!(target: TELEMETRY_TARGET, level);
    TimingGuard::new(label.into(), level, armed)
}

/// Sets the global telemetry state.
///
/// Call this whenever user preferences change; existing guards keep the state
/// they armed with, new guards pick up the update.
pub fn configure(enabled: bool, level: LevelFilter) {
    let packed = if enabled { filter_index(level) } else { 0 };
    TELEMETRY_STATE.store(packed, Ordering::Relaxed);
}

/// Returns whether telemetry output is currently enabled at any level.
pub fn telemetry_enabled() -> bool {
    TELEMETRY_STATE.load(Ordering::Relaxed) != 0
}

/// Returns `true` when telemetry is enabled and admits `level`.
pub fn telemetry_allows(level: Level) -> bool {
    level_index(level) <= TELEMETRY_STATE.load(Ordering::Relaxed)
}

fn level_index(level: Level) -> u8 {
    match level {
        Level::Error => 1,
        Level::Warn => 2,
        Level::Info => 3,
        Level::Debug => 4,
        Level::Trace => 5,
    }
}

fn filter_index(filter: LevelFilter) -> u8 {
    match filter {
        LevelFilter::Off => 0,
        LevelFilter::Error => 1,
        LevelFilter::Warn => 2,
        LevelFilter::Info => 3,
        LevelFilter::Debug => 4,
        LevelFilter::Trace => 5,
    }
}
