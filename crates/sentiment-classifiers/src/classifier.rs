//! Classifier trait and common types

use async_trait::async_trait;
use sentiment_core::{Error, Result, SentimentResult};

/// A loaded sentiment model
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text.
    ///
    /// Candidates are ordered best first. Callers only consume the first one.
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationResult>>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// One candidate of a classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Classification label
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }
}

impl From<ClassificationResult> for SentimentResult {
    fn from(result: ClassificationResult) -> Self {
        SentimentResult::new(result.label, result.score)
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,
}

/// Take the first candidate of a classification.
///
/// An empty candidate list is reported as [`Error::EmptyPrediction`] rather
/// than indexed blindly.
pub fn top_prediction(candidates: Vec<ClassificationResult>) -> Result<ClassificationResult> {
    candidates.into_iter().next().ok_or(Error::EmptyPrediction)
}
