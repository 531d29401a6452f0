//! Observation types produced by backend requests.
//!
//! Each request kind maps to one observation struct. Wire names use
//! camelCase to match the JSON reports downstream consumers already parse;
//! optional fields are omitted rather than serialized as null.

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::geometry::{NormalizedPoint, NormalizedRect};
use crate::pose::JointName;

/// A detected face with orientation angles and optional embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceObservation {
    /// Location in normalized image space.
    pub bounding_box: NormalizedRect,
    /// Rotation around the axis pointing out of the image, in radians.
    /// Zero when the backend does not report it.
    pub roll: f64,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f64,
    /// Rotation around the horizontal axis, in radians.
    pub pitch: f64,
    /// Detection confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// Feature print of the face region, when one was requested.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embedding: Option<Embedding>,
}

/// A detected human figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanObservation {
    /// Location in normalized image space.
    pub bounding_box: NormalizedRect,
    /// Detection confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

/// A recognized run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObservation {
    /// Top candidate transcript.
    pub text: String,
    /// Recognition confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// Location in normalized image space.
    pub bounding_box: NormalizedRect,
}

/// A classification label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label identifier, e.g. `"outdoor"` or `"document"`.
    pub identifier: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

/// A single recognized body joint.
///
/// The location flattens into the joint on the wire, so a joint serializes
/// as `{"name": ..., "x": ..., "y": ..., "confidence": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Which joint this is.
    pub name: JointName,
    /// Position in normalized image space.
    #[serde(flatten)]
    pub location: NormalizedPoint,
    /// Per-joint confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

/// One person's detected body pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PoseObservation {
    /// Joints the backend could locate, at most one per [`JointName`].
    pub joints: Vec<Joint>,
}

impl PoseObservation {
    /// Looks up a joint by name.
    pub fn joint(&self, name: JointName) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.name == name)
    }
}

/// A foreground-subject mask at image resolution.
///
/// Pixels hold coverage in `[0, 255]`; anything above 127 counts as subject.
/// Masks are runtime artifacts handed to raster tooling, they do not appear
/// in JSON reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectMask {
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
    /// Number of distinct foreground instances merged into the mask.
    pub instances: u32,
    /// Row-major coverage values, `width * height` entries.
    pub pixels: Vec<u8>,
}

impl SubjectMask {
    /// Fraction of pixels covered by the subject, in `[0.0, 1.0]`.
    pub fn coverage(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let covered = self.pixels.iter().filter(|&&p| p > 127).count();
        covered as f64 / self.pixels.len() as f64
    }
}
