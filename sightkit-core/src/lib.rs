//! Core image-analysis primitives.
//!
//! This crate defines the backend seam for a platform vision toolkit, the
//! observation types its requests produce, and the report assembly that turns
//! a set of observations into serializable JSON. The numeric pieces (cosine
//! similarity over feature-print embeddings, normalized-rect geometry) live
//! here as well so they can be tested independently of any backend.

/// Vision backend trait and request inputs.
pub mod backend;
/// Confidence filtering for classification results.
pub mod classify;
/// Feature-print embeddings and their comparison helpers.
pub mod embedding;
/// Normalized and pixel-space rectangle math.
pub mod geometry;
/// Observation types returned by backend requests.
pub mod observation;
/// Body-pose joint names and limb topology.
pub mod pose;
/// High-level analyzer and report serialization.
pub mod report;
/// Cosine similarity and distance over raw vectors.
pub mod similarity;

pub use backend::{ImageSource, VisionBackend, VisionError};
pub use classify::ClassificationFilter;
pub use embedding::{Embedding, EmbeddingError};
pub use geometry::{NormalizedPoint, NormalizedRect, PixelRect, largest_by_area};
pub use observation::{
    Classification, FaceObservation, HumanObservation, Joint, PoseObservation, SubjectMask,
    TextObservation,
};
pub use pose::{JointName, LIMB_PAIRS, LimbSegment, limb_segments};
pub use report::{
    AnalysisReport, Analyzer, ClassificationReport, DistanceReport, EmbeddingReport, FacesReport,
    HashReport, HumansReport, NsfwReport, PosesReport, TextReport, hash_report, render_json,
};
pub use similarity::{SimilarityError, cosine_distance, cosine_similarity};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
