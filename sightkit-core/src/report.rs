//! High-level analysis runner and its serializable reports.
//!
//! [`Analyzer`] drives a [`VisionBackend`] through the request kinds and
//! assembles the results into per-request reports, or one combined
//! [`AnalysisReport`] covering everything. Each report names its input so
//! batch consumers can line results up with their images.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use sightkit_utils::{AnalysisSettings, configure_telemetry, sha1_hex_file, timing_guard_if};

use crate::backend::{ImageSource, VisionBackend, VisionError};
use crate::classify::ClassificationFilter;
use crate::embedding::Embedding;
use crate::geometry::{PixelRect, largest_by_area};
use crate::observation::{
    Classification, FaceObservation, HumanObservation, PoseObservation, SubjectMask,
    TextObservation,
};
use crate::similarity::cosine_distance;

/// Combined results of every analysis request on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Detected faces, each with an embedding when its region could be
    /// cropped and embedded.
    pub faces: Vec<FaceObservation>,
    /// Detected human figures.
    pub humans: Vec<HumanObservation>,
    /// Recognized text runs.
    pub text: Vec<TextObservation>,
    /// Detected body poses.
    pub poses: Vec<PoseObservation>,
    /// Classification labels surviving the configured filter.
    pub classifications: Vec<Classification>,
    /// Feature print of the whole image.
    pub embedding: Embedding,
}

/// Results of a face detection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacesReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Detected faces.
    pub faces: Vec<FaceObservation>,
}

/// Results of a human detection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumansReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Detected human figures.
    pub humans: Vec<HumanObservation>,
}

/// Results of a text recognition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Custom vocabulary the request was biased with.
    pub custom_words: Vec<String>,
    /// Recognized text runs.
    pub text: Vec<TextObservation>,
}

/// Results of a body-pose request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosesReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Detected body poses.
    pub poses: Vec<PoseObservation>,
}

/// Results of a classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Labels surviving the configured filter.
    pub classifications: Vec<Classification>,
}

/// Results of a whole-image feature-print request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Feature print of the whole image.
    pub embedding: Embedding,
}

/// Cosine distance between the feature prints of two images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    /// First input, as given.
    #[serde(rename = "A")]
    pub a: String,
    /// Second input, as given.
    #[serde(rename = "B")]
    pub b: String,
    /// Cosine distance in `[0.0, 2.0]`, `0.0` meaning identical direction.
    pub distance: f64,
}

/// Results of a sensitivity scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NsfwReport {
    /// The analyzed input, as given.
    pub input: String,
    /// Sensitivity score in `[0.0, 1.0]`.
    pub nsfw: f32,
}

/// SHA-1 digest of an image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashReport {
    /// The hashed input path, as given.
    pub input: String,
    /// Lowercase hex digest of the file bytes.
    pub sha1: String,
}

/// Computes the [`HashReport`] for a local file.
pub fn hash_report<P: AsRef<std::path::Path>>(path: P) -> Result<HashReport> {
    let path = path.as_ref();
    let sha1 = sha1_hex_file(path)?;
    Ok(HashReport {
        input: path.display().to_string(),
        sha1,
    })
}

/// Serializes any report as pretty-printed JSON.
pub fn render_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

/// Drives a vision backend and assembles reports.
pub struct Analyzer<B> {
    backend: B,
    settings: AnalysisSettings,
}

impl<B: VisionBackend> Analyzer<B> {
    /// Creates an analyzer with default settings.
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, AnalysisSettings::default())
    }

    /// Creates an analyzer with explicit settings.
    ///
    /// The settings' telemetry preference is applied globally so timing
    /// guards created by this analyzer can arm.
    pub fn with_settings(backend: B, mut settings: AnalysisSettings) -> Self {
        settings.sanitize();
        configure_telemetry(settings.telemetry.enabled, settings.telemetry.level_filter());
        Self { backend, settings }
    }

    /// Borrows the active settings.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Borrows the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs every request kind and combines the results.
    ///
    /// Faces are always enriched with per-region embeddings here; a face
    /// whose region cannot be cropped or embedded is reported without one.
    pub fn analyze(&self, source: &ImageSource) -> Result<AnalysisReport> {
        let _timing = timing_guard_if("analyze", log::Level::Debug, self.settings.telemetry.enabled);

        let mut faces = self
            .backend
            .detect_faces(source)
            .with_context(|| format!("face detection failed for {source}"))?;
        self.embed_face_regions(source, &mut faces);

        let humans = self
            .backend
            .detect_humans(source)
            .with_context(|| format!("human detection failed for {source}"))?;
        let text = self
            .backend
            .recognize_text(source, &self.settings.text)
            .with_context(|| format!("text recognition failed for {source}"))?;
        let poses = self
            .backend
            .detect_poses(source)
            .with_context(|| format!("pose detection failed for {source}"))?;
        let classifications = self.filtered_classifications(source)?;
        let embedding = self
            .backend
            .embed(source, None)
            .with_context(|| format!("feature-print request failed for {source}"))?;

        debug!(
            "analyzed {source}: {} faces, {} humans, {} text runs, {} poses, {} labels",
            faces.len(),
            humans.len(),
            text.len(),
            poses.len(),
            classifications.len()
        );

        Ok(AnalysisReport {
            input: source.to_string(),
            faces,
            humans,
            text,
            poses,
            classifications,
            embedding,
        })
    }

    /// Detects faces, attaching embeddings when the face settings ask for
    /// them.
    pub fn faces(&self, source: &ImageSource) -> Result<FacesReport> {
        let mut faces = self
            .backend
            .detect_faces(source)
            .with_context(|| format!("face detection failed for {source}"))?;
        if self.settings.faces.embeddings {
            self.embed_face_regions(source, &mut faces);
        }
        Ok(FacesReport {
            input: source.to_string(),
            faces,
        })
    }

    /// Detects human figures.
    pub fn humans(&self, source: &ImageSource) -> Result<HumansReport> {
        let humans = self
            .backend
            .detect_humans(source)
            .with_context(|| format!("human detection failed for {source}"))?;
        Ok(HumansReport {
            input: source.to_string(),
            humans,
        })
    }

    /// Recognizes text with the configured recognition options.
    pub fn text(&self, source: &ImageSource) -> Result<TextReport> {
        let text = self
            .backend
            .recognize_text(source, &self.settings.text)
            .with_context(|| format!("text recognition failed for {source}"))?;
        Ok(TextReport {
            input: source.to_string(),
            custom_words: self.settings.text.custom_words.clone(),
            text,
        })
    }

    /// Detects body poses.
    pub fn poses(&self, source: &ImageSource) -> Result<PosesReport> {
        let poses = self
            .backend
            .detect_poses(source)
            .with_context(|| format!("pose detection failed for {source}"))?;
        Ok(PosesReport {
            input: source.to_string(),
            poses,
        })
    }

    /// Classifies the image and applies the configured filter.
    pub fn classifications(&self, source: &ImageSource) -> Result<ClassificationReport> {
        let classifications = self.filtered_classifications(source)?;
        Ok(ClassificationReport {
            input: source.to_string(),
            classifications,
        })
    }

    /// Computes the whole-image feature print.
    pub fn embedding(&self, source: &ImageSource) -> Result<EmbeddingReport> {
        let embedding = self
            .backend
            .embed(source, None)
            .with_context(|| format!("feature-print request failed for {source}"))?;
        Ok(EmbeddingReport {
            input: source.to_string(),
            embedding,
        })
    }

    /// Embeds two images and reports the cosine distance between them.
    pub fn distance(&self, a: &ImageSource, b: &ImageSource) -> Result<DistanceReport> {
        let _timing =
            timing_guard_if("distance", log::Level::Debug, self.settings.telemetry.enabled);

        let embedding_a = self
            .backend
            .embed(a, None)
            .with_context(|| format!("feature-print request failed for {a}"))?;
        let embedding_b = self
            .backend
            .embed(b, None)
            .with_context(|| format!("feature-print request failed for {b}"))?;
        let distance = cosine_distance(embedding_a.as_slice(), embedding_b.as_slice())
            .with_context(|| format!("cannot compare feature prints of {a} and {b}"))?;
        Ok(DistanceReport {
            a: a.to_string(),
            b: b.to_string(),
            distance,
        })
    }

    /// Segments the foreground subject.
    pub fn subject(&self, source: &ImageSource) -> Result<SubjectMask> {
        let _timing =
            timing_guard_if("subject", log::Level::Debug, self.settings.telemetry.enabled);
        self.backend
            .segment_subject(source)
            .with_context(|| format!("subject segmentation failed for {source}"))
    }

    /// Scores the image for sensitive content.
    pub fn nsfw(&self, source: &ImageSource) -> Result<NsfwReport> {
        let nsfw = self
            .backend
            .nsfw_score(source)
            .with_context(|| format!("sensitivity scoring failed for {source}"))?;
        Ok(NsfwReport {
            input: source.to_string(),
            nsfw,
        })
    }

    /// Pixel region of the largest detected face.
    ///
    /// Fails with [`VisionError::NoSubjectFound`] when no face is detected
    /// or the largest one collapses to nothing in pixel space.
    pub fn largest_face_region(&self, source: &ImageSource) -> Result<PixelRect> {
        let faces = self
            .backend
            .detect_faces(source)
            .with_context(|| format!("face detection failed for {source}"))?;
        let (width, height) = self
            .backend
            .dimensions(source)
            .with_context(|| format!("failed to read dimensions of {source}"))?;
        largest_by_area(&faces, |face| &face.bounding_box)
            .and_then(|face| face.bounding_box.to_pixel_rect(width, height))
            .ok_or_else(|| VisionError::NoSubjectFound.into())
    }

    fn filtered_classifications(&self, source: &ImageSource) -> Result<Vec<Classification>> {
        let raw = self
            .backend
            .classify(source)
            .with_context(|| format!("classification failed for {source}"))?;
        Ok(ClassificationFilter::from(&self.settings.classification).apply(&raw))
    }

    /// Attaches a region embedding to each face that maps to a usable pixel
    /// rect. Failures degrade to a face without an embedding.
    fn embed_face_regions(&self, source: &ImageSource, faces: &mut [FaceObservation]) {
        if faces.is_empty() {
            return;
        }
        let (width, height) = match self.backend.dimensions(source) {
            Ok(dims) => dims,
            Err(err) => {
                warn!("skipping face embeddings for {source}: {err}");
                return;
            }
        };
        for face in faces {
            let Some(region) = face.bounding_box.to_pixel_rect(width, height) else {
                warn!("face region of {source} is outside the image, skipping embedding");
                continue;
            };
            match self.backend.embed(source, Some(region)) {
                Ok(embedding) => face.embedding = Some(embedding),
                Err(err) => {
                    warn!("face embedding failed for {source}: {err}");
                }
            }
        }
    }
}
