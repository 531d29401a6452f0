//! Shared configuration types consumed across the sightkit workspace.
//!
//! These structures provide a common representation for the per-request knobs
//! the host vision toolkit exposes (classification thresholds, text
//! recognition options, pose gating) so they can be serialized to disk and
//! reused by any front end embedding the library.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Classification filtering parameters.
///
/// These settings control which labels survive a classification request:
/// everything at or above `min_confidence` is kept, and identifiers listed in
/// `include_identifiers` are reported even when they fall below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    /// Minimum confidence for a label to be reported.
    pub min_confidence: f32,
    /// Identifiers to report even if they don't meet the minimum confidence.
    pub include_identifiers: Vec<String>,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.4,
            include_identifiers: Vec::new(),
        }
    }
}

/// Speed/quality trade-off for text recognition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextRecognitionLevel {
    /// Favor recognition quality over throughput (default).
    #[default]
    Accurate,
    /// Favor throughput; suitable for live or batch scanning.
    Fast,
}

impl fmt::Display for TextRecognitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TextRecognitionLevel::Accurate => "accurate",
                TextRecognitionLevel::Fast => "fast",
            }
        )
    }
}

impl FromStr for TextRecognitionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accurate" => Ok(TextRecognitionLevel::Accurate),
            "fast" => Ok(TextRecognitionLevel::Fast),
            other => Err(format!(
                "invalid recognition level '{other}'; expected 'accurate' or 'fast'"
            )),
        }
    }
}

/// Settings for text recognition requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Recognition level passed through to the backend.
    pub recognition_level: TextRecognitionLevel,
    /// Whether the backend should apply language-model correction.
    pub language_correction: bool,
    /// Custom vocabulary to bias recognition toward.
    pub custom_words: Vec<String>,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            recognition_level: TextRecognitionLevel::Accurate,
            language_correction: true,
            custom_words: Vec::new(),
        }
    }
}

/// Settings for face detection requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FaceSettings {
    /// Attach a feature-print embedding to each detected face.
    pub embeddings: bool,
}

/// Settings for body-pose requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseSettings {
    /// Minimum per-joint confidence for a joint to participate in limb
    /// segments. Joints below this are still reported, just not connected.
    pub min_joint_confidence: f32,
}

impl Default for PoseSettings {
    fn default() -> Self {
        Self {
            min_joint_confidence: 0.5,
        }
    }
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether telemetry timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }

    /// Update the level string from a `LevelFilter` value.
    pub fn set_level(&mut self, level: LevelFilter) {
        let label = match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        };
        self.level = label.to_string();
    }
}

/// Persistent analysis settings consumed by library embedders.
///
/// This struct aggregates all user-configurable request parameters, allowing
/// them to be loaded from and saved to a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Classification filtering parameters.
    pub classification: ClassificationSettings,
    /// Text recognition parameters.
    pub text: TextSettings,
    /// Face detection parameters.
    pub faces: FaceSettings,
    /// Body-pose parameters.
    pub pose: PoseSettings,
    /// Telemetry and diagnostics preferences.
    pub telemetry: TelemetrySettings,
}

impl AnalysisSettings {
    /// Clamp values to sensible ranges.
    pub fn sanitize(&mut self) {
        self.classification.min_confidence = self.classification.min_confidence.clamp(0.0, 1.0);
        self.pose.min_joint_confidence = self.pose.min_joint_confidence.clamp(0.0, 1.0);
    }

    /// Load settings from a JSON file.
    ///
    /// If the file does not exist or cannot be parsed, an error is returned.
    /// Values absent from the JSON fall back to their defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: AnalysisSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON.
    ///
    /// This will overwrite the file if it already exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}

/// Returns the default path for persisted analysis settings (`config/analysis.json`).
pub fn default_settings_path() -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join("config/analysis.json"))
        .unwrap_or_else(|_| PathBuf::from("config/analysis.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn default_settings_round_trip() {
        let file = NamedTempFile::new().expect("tempfile");
        let settings = AnalysisSettings::default();
        settings.save_to_path(file.path()).expect("save");

        let loaded = AnalysisSettings::load_from_path(file.path()).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let file = NamedTempFile::new().expect("tempfile");
        let json = r#"{
            "classification": { "min_confidence": 0.7 },
            "text": { "custom_words": ["sightkit"] }
        }"#;
        fs::write(file.path(), json).expect("write custom settings");

        let loaded = AnalysisSettings::load_from_path(file.path()).expect("load");
        assert_eq!(loaded.classification.min_confidence, 0.7);
        assert!(loaded.classification.include_identifiers.is_empty());
        assert_eq!(loaded.text.custom_words, vec!["sightkit".to_string()]);
        assert_eq!(
            loaded.text.recognition_level,
            TextRecognitionLevel::Accurate
        );
        assert!(loaded.text.language_correction);
        assert!(!loaded.faces.embeddings);
        assert_eq!(loaded.pose.min_joint_confidence, 0.5);
    }

    #[test]
    fn sanitize_clamps_out_of_range_thresholds() {
        let mut settings = AnalysisSettings::default();
        settings.classification.min_confidence = 3.5;
        settings.pose.min_joint_confidence = -1.0;
        settings.sanitize();
        assert_eq!(settings.classification.min_confidence, 1.0);
        assert_eq!(settings.pose.min_joint_confidence, 0.0);
    }

    #[test]
    fn recognition_level_parses_variants() {
        assert_eq!(
            "Accurate".parse::<TextRecognitionLevel>().unwrap(),
            TextRecognitionLevel::Accurate
        );
        assert_eq!(
            " fast ".parse::<TextRecognitionLevel>().unwrap(),
            TextRecognitionLevel::Fast
        );
        assert!("best".parse::<TextRecognitionLevel>().is_err());
    }

    #[test]
    fn telemetry_level_parses_variants() {
        let telemetry = TelemetrySettings {
            level: "TRACE".into(),
            ..TelemetrySettings::default()
        };
        assert_eq!(telemetry.level_filter(), LevelFilter::Trace);

        let telemetry = TelemetrySettings {
            level: "Warn".into(),
            ..TelemetrySettings::default()
        };
        assert_eq!(telemetry.level_filter(), LevelFilter::Warn);

        let mut telemetry = TelemetrySettings::default();
        telemetry.set_level(LevelFilter::Info);
        assert_eq!(telemetry.level, "info");
    }
}
