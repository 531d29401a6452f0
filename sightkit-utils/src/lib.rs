//! Common helpers shared across sightkit crates.

/// Analysis settings and their JSON persistence.
pub mod config;
/// SHA-1 digests over byte slices and files.
pub mod digest;
/// Test fixture loading and path resolution.
pub mod fixtures;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;

pub use config::{
    AnalysisSettings, ClassificationSettings, FaceSettings, PoseSettings, TelemetrySettings,
    TextRecognitionLevel, TextSettings, default_settings_path,
};
pub use digest::{sha1_hex, sha1_hex_file};
pub use fixtures::{fixture_path, fixtures_dir, load_fixture_bytes, load_fixture_json};
pub use telemetry::{
    TimingGuard, configure as configure_telemetry, telemetry_allows, telemetry_enabled,
    timing_guard, timing_guard_if,
};

/// Initialize logging once for library consumers and test harnesses.
///
/// This function respects the `RUST_LOG` environment variable if it is set.
/// Otherwise, it falls back to the provided default filter level.
///
/// # Arguments
///
/// * `default_filter` - The `LevelFilter` to use if `RUST_LOG` is not set.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.filter_module(telemetry::TELEMETRY_TARGET, LevelFilter::Trace);

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}

/// Validate that a path exists and resolve it to an absolute path.
///
/// # Arguments
///
/// * `path` - The path to validate and normalize.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<std::path::PathBuf> {
    let path = path.as_ref();
    anyhow::ensure!(path.exists(), "path does not exist: {}", path.display());
    path.canonicalize()
        .with_context(|| format!("failed to canonicalize path {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_tolerates_repeat_calls() {
        assert!(init_logging(LevelFilter::Debug).is_ok());
        // Second call hits the already-initialized branch.
        assert!(init_logging(LevelFilter::Trace).is_ok());
    }

    #[test]
    fn normalize_path_resolves_existing_paths_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = normalize_path(dir.path()).expect("normalize");
        assert!(resolved.is_absolute());

        let missing = dir.path().join("not-there.json");
        let err = normalize_path(&missing).unwrap_err();
        assert!(err.to_string().contains("not-there.json"));
    }
}
