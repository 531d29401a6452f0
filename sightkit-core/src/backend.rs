//! The seam between analysis logic and a platform vision toolkit.
//!
//! Everything that touches pixels or proprietary models sits behind
//! [`VisionBackend`]. The analyzer only sees typed observations, which keeps
//! report assembly testable with a deterministic in-memory backend
//! ([`CannedVision`]).

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::embedding::{Embedding, EmbeddingError};
use crate::geometry::PixelRect;
use crate::observation::{
    Classification, FaceObservation, HumanObservation, PoseObservation, SubjectMask,
    TextObservation,
};
use sightkit_utils::TextSettings;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A local file.
    Path(PathBuf),
    /// A remote image addressed by URL.
    Url(String),
}

impl ImageSource {
    /// Builds a source from a local path.
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        ImageSource::Path(path.as_ref().to_path_buf())
    }

    /// Interprets a raw input string: `http(s)` inputs become URLs,
    /// everything else a local path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            ImageSource::Url(input.to_string())
        } else {
            ImageSource::Path(PathBuf::from(input))
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => write!(f, "{}", path.display()),
            ImageSource::Url(url) => f.write_str(url),
        }
    }
}

/// Failures surfaced by a vision backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    /// Subject segmentation ran but found no foreground instance.
    #[error("no subject found in the image")]
    NoSubjectFound,
    /// The image could not be loaded or decoded.
    #[error("failed to load image from {input}")]
    ImageLoad {
        /// The offending source, for diagnostics.
        input: String,
    },
    /// The backend does not implement the requested analysis.
    #[error("unsupported request: {0}")]
    Unsupported(String),
    /// A feature-print payload could not be decoded.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    /// Any other backend-side failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Interface to a platform vision toolkit.
///
/// Implementations run the actual models. All geometry comes back in
/// normalized lower-left-origin space; faces arrive without embeddings, the
/// caller requests those per region via [`VisionBackend::embed`].
pub trait VisionBackend: Send + Sync {
    /// Pixel dimensions `(width, height)` of the source image.
    fn dimensions(&self, source: &ImageSource) -> Result<(u32, u32), VisionError>;

    /// Detects faces with orientation angles.
    fn detect_faces(&self, source: &ImageSource) -> Result<Vec<FaceObservation>, VisionError>;

    /// Detects human figures.
    fn detect_humans(&self, source: &ImageSource) -> Result<Vec<HumanObservation>, VisionError>;

    /// Recognizes text runs.
    fn recognize_text(
        &self,
        source: &ImageSource,
        settings: &TextSettings,
    ) -> Result<Vec<TextObservation>, VisionError>;

    /// Detects body poses.
    fn detect_poses(&self, source: &ImageSource) -> Result<Vec<PoseObservation>, VisionError>;

    /// Classifies the whole image against the backend's taxonomy, ordered by
    /// descending confidence.
    fn classify(&self, source: &ImageSource) -> Result<Vec<Classification>, VisionError>;

    /// Computes a feature print of the whole image, or of a pixel region
    /// when `region` is given.
    fn embed(
        &self,
        source: &ImageSource,
        region: Option<PixelRect>,
    ) -> Result<Embedding, VisionError>;

    /// Produces a foreground-subject mask.
    ///
    /// Returns [`VisionError::NoSubjectFound`] when segmentation yields no
    /// instance.
    fn segment_subject(&self, source: &ImageSource) -> Result<SubjectMask, VisionError>;

    /// Scores how likely the image is to be sensitive, in `[0.0, 1.0]`.
    fn nsfw_score(&self, source: &ImageSource) -> Result<f32, VisionError>;
}

/// Deterministic in-memory backend for tests and pipeline development.
///
/// Every request returns pre-seeded observations regardless of the source.
/// Region embeds fall back to a value derived from the rect itself, so face
/// enrichment stays deterministic without seeding every crop.
#[derive(Debug, Clone, Default)]
pub struct CannedVision {
    width: u32,
    height: u32,
    faces: Vec<FaceObservation>,
    humans: Vec<HumanObservation>,
    text: Vec<TextObservation>,
    poses: Vec<PoseObservation>,
    classifications: Vec<Classification>,
    image_embedding: Option<Embedding>,
    source_embeddings: Vec<(String, Embedding)>,
    region_embeddings: Vec<(PixelRect, Embedding)>,
    subject: Option<SubjectMask>,
    nsfw: Option<f32>,
}

impl CannedVision {
    /// Creates a backend reporting the given image dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Seeds face detections.
    pub fn with_faces(mut self, faces: Vec<FaceObservation>) -> Self {
        self.faces = faces;
        self
    }

    /// Seeds human detections.
    pub fn with_humans(mut self, humans: Vec<HumanObservation>) -> Self {
        self.humans = humans;
        self
    }

    /// Seeds recognized text.
    pub fn with_text(mut self, text: Vec<TextObservation>) -> Self {
        self.text = text;
        self
    }

    /// Seeds body poses.
    pub fn with_poses(mut self, poses: Vec<PoseObservation>) -> Self {
        self.poses = poses;
        self
    }

    /// Seeds raw classification output, highest confidence first.
    pub fn with_classifications(mut self, classifications: Vec<Classification>) -> Self {
        self.classifications = classifications;
        self
    }

    /// Seeds the whole-image feature print.
    pub fn with_image_embedding(mut self, embedding: Embedding) -> Self {
        self.image_embedding = Some(embedding);
        self
    }

    /// Seeds the whole-image feature print for one specific source, taking
    /// precedence over [`CannedVision::with_image_embedding`].
    pub fn with_source_embedding(mut self, input: &str, embedding: Embedding) -> Self {
        self.source_embeddings.push((input.to_string(), embedding));
        self
    }

    /// Seeds the feature print for one exact pixel region.
    pub fn with_region_embedding(mut self, region: PixelRect, embedding: Embedding) -> Self {
        self.region_embeddings.push((region, embedding));
        self
    }

    /// Seeds the subject mask. Without one, segmentation reports
    /// [`VisionError::NoSubjectFound`].
    pub fn with_subject(mut self, mask: SubjectMask) -> Self {
        self.subject = Some(mask);
        self
    }

    /// Seeds the sensitivity score. Without one, scoring reports
    /// [`VisionError::Unsupported`].
    pub fn with_nsfw(mut self, score: f32) -> Self {
        self.nsfw = Some(score);
        self
    }

    fn synthesize_region_embedding(region: &PixelRect) -> Embedding {
        // Offset keeps the vector away from zero magnitude.
        Embedding::new(vec![
            region.x as f32 + 1.0,
            region.y as f32 + 1.0,
            region.width as f32,
            region.height as f32,
        ])
    }
}

impl VisionBackend for CannedVision {
    fn dimensions(&self, _source: &ImageSource) -> Result<(u32, u32), VisionError> {
        Ok((self.width, self.height))
    }

    fn detect_faces(&self, _source: &ImageSource) -> Result<Vec<FaceObservation>, VisionError> {
        Ok(self.faces.clone())
    }

    fn detect_humans(&self, _source: &ImageSource) -> Result<Vec<HumanObservation>, VisionError> {
        Ok(self.humans.clone())
    }

    fn recognize_text(
        &self,
        _source: &ImageSource,
        _settings: &TextSettings,
    ) -> Result<Vec<TextObservation>, VisionError> {
        Ok(self.text.clone())
    }

    fn detect_poses(&self, _source: &ImageSource) -> Result<Vec<PoseObservation>, VisionError> {
        Ok(self.poses.clone())
    }

    fn classify(&self, _source: &ImageSource) -> Result<Vec<Classification>, VisionError> {
        Ok(self.classifications.clone())
    }

    fn embed(
        &self,
        source: &ImageSource,
        region: Option<PixelRect>,
    ) -> Result<Embedding, VisionError> {
        match region {
            None => {
                let key = source.to_string();
                let keyed = self
                    .source_embeddings
                    .iter()
                    .find(|(input, _)| *input == key)
                    .map(|(_, embedding)| embedding.clone());
                keyed.or_else(|| self.image_embedding.clone()).ok_or_else(|| {
                    VisionError::Unsupported("no image embedding seeded".to_string())
                })
            }
            Some(rect) => {
                let seeded = self
                    .region_embeddings
                    .iter()
                    .find(|(candidate, _)| *candidate == rect)
                    .map(|(_, embedding)| embedding.clone());
                Ok(seeded.unwrap_or_else(|| Self::synthesize_region_embedding(&rect)))
            }
        }
    }

    fn segment_subject(&self, _source: &ImageSource) -> Result<SubjectMask, VisionError> {
        self.subject.clone().ok_or(VisionError::NoSubjectFound)
    }

    fn nsfw_score(&self, _source: &ImageSource) -> Result<f32, VisionError> {
        self.nsfw
            .ok_or_else(|| VisionError::Unsupported("no sensitivity model seeded".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert_eq!(
            ImageSource::parse("https://example.com/cat.jpg"),
            ImageSource::Url("https://example.com/cat.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse("photos/cat.jpg"),
            ImageSource::Path(PathBuf::from("photos/cat.jpg"))
        );
        assert_eq!(
            ImageSource::parse("httpserver/cat.jpg"),
            ImageSource::Path(PathBuf::from("httpserver/cat.jpg"))
        );
    }

    #[test]
    fn source_display_matches_original_input() {
        assert_eq!(
            ImageSource::parse("photos/cat.jpg").to_string(),
            "photos/cat.jpg"
        );
        assert_eq!(
            ImageSource::parse("https://example.com/a.png").to_string(),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn canned_backend_reports_seeded_dimensions() {
        let backend = CannedVision::new(1920, 1080);
        let source = ImageSource::parse("any.jpg");
        assert_eq!(backend.dimensions(&source).unwrap(), (1920, 1080));
    }

    #[test]
    fn seeded_region_embedding_wins_over_synthesis() {
        let rect = PixelRect {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        };
        let backend = CannedVision::new(100, 100)
            .with_region_embedding(rect, Embedding::new(vec![9.0, 9.0]));
        let source = ImageSource::parse("any.jpg");

        let seeded = backend.embed(&source, Some(rect)).unwrap();
        assert_eq!(seeded.as_slice(), &[9.0, 9.0]);

        let other = PixelRect {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        let synthesized = backend.embed(&source, Some(other)).unwrap();
        assert_eq!(synthesized.as_slice(), &[2.0, 3.0, 3.0, 4.0]);
        // Same rect, same vector.
        assert_eq!(backend.embed(&source, Some(other)).unwrap(), synthesized);
    }

    #[test]
    fn source_keyed_embedding_takes_precedence() {
        let backend = CannedVision::new(10, 10)
            .with_image_embedding(Embedding::new(vec![1.0, 0.0]))
            .with_source_embedding("b.jpg", Embedding::new(vec![0.0, 1.0]));
        let a = ImageSource::parse("a.jpg");
        let b = ImageSource::parse("b.jpg");
        assert_eq!(backend.embed(&a, None).unwrap().as_slice(), &[1.0, 0.0]);
        assert_eq!(backend.embed(&b, None).unwrap().as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn missing_subject_maps_to_no_subject_found() {
        let backend = CannedVision::new(10, 10);
        let source = ImageSource::parse("any.jpg");
        assert_eq!(
            backend.segment_subject(&source),
            Err(VisionError::NoSubjectFound)
        );
        assert_eq!(
            VisionError::NoSubjectFound.to_string(),
            "no subject found in the image"
        );
    }

    #[test]
    fn unseeded_scores_surface_as_unsupported() {
        let backend = CannedVision::new(10, 10);
        let source = ImageSource::parse("any.jpg");
        assert!(matches!(
            backend.nsfw_score(&source),
            Err(VisionError::Unsupported(_))
        ));
        assert!(matches!(
            backend.embed(&source, None),
            Err(VisionError::Unsupported(_))
        ));
    }

    #[test]
    fn load_and_backend_errors_name_their_cause() {
        let load = VisionError::ImageLoad {
            input: "broken.jpg".to_string(),
        };
        assert_eq!(load.to_string(), "failed to load image from broken.jpg");

        let failure = VisionError::Backend("model crashed".to_string());
        assert_eq!(failure.to_string(), "backend failure: model crashed");
    }
}
