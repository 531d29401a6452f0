//! Helpers for locating and loading shared test fixtures.
//!
//! Fixtures live in the workspace-level `fixtures/` directory so unit tests,
//! integration tests, and benches all resolve the same files regardless of
//! which crate they run from. The `SIGHTKIT_FIXTURE_ROOT` environment variable
//! overrides the search for callers with a non-standard layout.

use anyhow::{Context, Result, bail, ensure};
use serde::de::DeserializeOwned;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Environment variable that overrides fixture resolution.
pub const FIXTURE_ROOT_ENV: &str = "SIGHTKIT_FIXTURE_ROOT";

/// Locates the shared `fixtures/` directory.
///
/// Resolution order: the `SIGHTKIT_FIXTURE_ROOT` environment variable if set,
/// otherwise the nearest `fixtures/` directory found by walking up from this
/// crate's manifest directory.
pub fn fixtures_dir() -> Result<PathBuf> {
    if let Ok(root) = env::var(FIXTURE_ROOT_ENV) {
        let path = PathBuf::from(root);
        ensure!(
            path.is_dir(),
            "{FIXTURE_ROOT_ENV} points at {} which is not a directory",
            path.display()
        );
        return Ok(path);
    }

    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    loop {
        let candidate = dir.join("fixtures");
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            bail!(
                "no fixtures/ directory found above {}; set {FIXTURE_ROOT_ENV} to override",
                env!("CARGO_MANIFEST_DIR")
            );
        }
    }
}

/// Resolves a path relative to the fixtures directory, checking existence.
pub fn fixture_path<P: AsRef<Path>>(relative: P) -> Result<PathBuf> {
    let path = fixtures_dir()?.join(relative.as_ref());
    ensure!(path.exists(), "fixture not found: {}", path.display());
    Ok(path)
}

/// Reads a fixture file into memory.
pub fn load_fixture_bytes<P: AsRef<Path>>(relative: P) -> Result<Vec<u8>> {
    let path = fixture_path(relative)?;
    fs::read(&path).with_context(|| format!("failed to read fixture {}", path.display()))
}

/// Reads and deserializes a JSON fixture.
pub fn load_fixture_json<T: DeserializeOwned, P: AsRef<Path>>(relative: P) -> Result<T> {
    let path = fixture_path(relative)?;
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse fixture JSON {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        value: u32,
    }

    // Env mutation and the fallback search share one test so they cannot race
    // each other under the parallel test runner.
    #[test]
    fn resolves_override_then_falls_back_to_ancestor_search() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sample_path = dir.path().join("sample.json");
        let mut file = fs::File::create(&sample_path).expect("create sample");
        file.write_all(br#"{ "name": "probe", "value": 7 }"#)
            .expect("write sample");
        drop(file);

        env::set_var(FIXTURE_ROOT_ENV, dir.path());
        let resolved = fixtures_dir().expect("override dir");
        assert_eq!(resolved, dir.path());

        let sample: Sample = load_fixture_json("sample.json").expect("load sample");
        assert_eq!(
            sample,
            Sample {
                name: "probe".into(),
                value: 7
            }
        );

        let bytes = load_fixture_bytes("sample.json").expect("load bytes");
        assert!(!bytes.is_empty());

        assert!(fixture_path("missing.json").is_err());
        env::remove_var(FIXTURE_ROOT_ENV);

        let fallback = fixtures_dir().expect("workspace fixtures dir");
        assert!(fallback.ends_with("fixtures"));
        assert!(fallback.is_dir());
    }
}
