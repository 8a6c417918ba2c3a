//! Extension point for model acquisition.

use crate::classifier::Classifier;
use crate::distilbert::CandleBackend;
use crate::lexicon::LexiconBackend;
use crate::model_config::ModelConfig;
use sentiment_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Acquires the classifier capability for a model identifier.
///
/// Implementations may block on downloads or weight loading internally but
/// must not hold the async executor while doing so.
#[async_trait::async_trait]
pub trait ModelBackend: Send + Sync {
    /// Load the model and return a shared, read-only handle to it.
    async fn load_model(&self, model_id: &str) -> Result<Arc<dyn Classifier>>;

    /// Backend name used in logs
    fn name(&self) -> &str;
}

/// Available backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Candle DistilBERT
    #[default]
    Candle,
    /// Keyword lexicon
    Lexicon,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candle" | "distilbert" => Ok(Self::Candle),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!(
                "unknown backend '{}' (expected 'candle' or 'lexicon')",
                other
            )),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Candle => f.write_str("candle"),
            Self::Lexicon => f.write_str("lexicon"),
        }
    }
}

/// Build the backend for a kind
pub fn build_backend(kind: BackendKind, config: &ModelConfig) -> Arc<dyn ModelBackend> {
    match kind {
        BackendKind::Candle => Arc::new(CandleBackend::new(config.clone())),
        BackendKind::Lexicon => Arc::new(LexiconBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_kind() {
        assert_eq!("candle".parse::<BackendKind>().unwrap(), BackendKind::Candle);
        assert_eq!("DistilBERT".parse::<BackendKind>().unwrap(), BackendKind::Candle);
        assert_eq!("lexicon".parse::<BackendKind>().unwrap(), BackendKind::Lexicon);
        assert!("onnx".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_build_backend_names() {
        let config = ModelConfig::default();
        assert_eq!(build_backend(BackendKind::Candle, &config).name(), "candle");
        assert_eq!(build_backend(BackendKind::Lexicon, &config).name(), "lexicon");
    }

    #[tokio::test]
    async fn test_lexicon_backend_loads() {
        let backend = build_backend(BackendKind::Lexicon, &ModelConfig::default());
        let classifier = backend.load_model("any").await.unwrap();
        let candidates = classifier.classify("I love this!").await.unwrap();
        assert_eq!(candidates[0].label, "POSITIVE");
    }
}
