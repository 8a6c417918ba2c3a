//! Core types for the sentiment analyser

use serde::{Deserialize, Serialize};

/// Label stored when a classification attempt fails
pub const ANALYSIS_FAILED_LABEL: &str = "ANALYSIS FAILED";

/// Lifecycle stage of the classifier acquisition
///
/// `Loading` is the only non-terminal stage. Once `Ready` or `Failed` is
/// reached the model is never reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed,
}

impl LoadState {
    /// Whether the state can no longer change
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Whether a loaded classifier is available
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one analysis: the top candidate of a classification, or the
/// failure sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Predicted label (e.g. `POSITIVE`, `NEGATIVE`)
    pub label: String,

    /// Confidence of the predicted label (0.0-1.0)
    pub score: f32,
}

impl SentimentResult {
    /// Create a new result
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// The sentinel stored when inference fails
    pub fn failed() -> Self {
        Self::new(ANALYSIS_FAILED_LABEL, 0.0)
    }
}
