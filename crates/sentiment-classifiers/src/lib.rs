//! Sentiment Classifiers
//!
//! The classifier capability consumed by the sentiment analyser surface.
//!
//! A [`ModelBackend`] acquires a model once and hands back a shared
//! [`Classifier`] handle. Two backends are provided:
//! - `candle`: DistilBERT fine-tuned on SST-2, downloaded from the Hugging Face hub
//! - `lexicon`: keyword matching, no download, used offline and in demos

pub mod backend;
pub mod classifier;
pub mod distilbert;
pub mod lexicon;
pub mod model_config;

pub use backend::{build_backend, BackendKind, ModelBackend};
pub use classifier::{top_prediction, ClassificationMetadata, ClassificationResult, Classifier};
pub use distilbert::{CandleBackend, DistilBertSentimentClassifier};
pub use lexicon::{LexiconBackend, LexiconClassifier};
pub use model_config::{InferenceConfig, ModelConfig, ModelSource, DEFAULT_MODEL_ID};
