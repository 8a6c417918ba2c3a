//! Error types for the sentiment analyser

/// Result type alias using the analyser's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sentiment analyser operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model acquisition errors (download, weights, tokenizer)
    #[error("model acquisition failed: {0}")]
    Acquisition(String),

    /// Inference errors raised by a loaded classifier
    #[error("inference failed: {0}")]
    Inference(String),

    /// The classifier resolved without any candidate
    #[error("classifier returned no predictions")]
    EmptyPrediction,
}

impl Error {
    /// Create a new acquisition error
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}
