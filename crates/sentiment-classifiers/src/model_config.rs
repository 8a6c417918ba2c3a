//! Model configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model acquired at startup unless configured otherwise
pub const DEFAULT_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Configuration for the single sentiment model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hugging Face repo id, or a local directory holding
    /// `config.json`, `model.safetensors` and `tokenizer.json`
    #[serde(default = "default_model_id")]
    pub id: String,

    /// Hub revision (ignored for local directories)
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Label names by class index. Empty means read `id2label` from the
    /// model's `config.json`.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Where hub downloads are cached. Defaults to
    /// `~/.cache/sentiment-analyser/models`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: default_model_id(),
            revision: default_revision(),
            labels: Vec::new(),
            cache_dir: None,
            inference: InferenceConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Create a configuration for a model id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Directory holding hub downloads
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache/sentiment-analyser/models")
        })
    }

    /// Resolve where the weights for `model_id` come from
    pub fn source_for(&self, model_id: &str) -> ModelSource {
        let path = Path::new(model_id);
        if path.is_dir() {
            ModelSource::Local {
                path: path.to_path_buf(),
            }
        } else {
            ModelSource::HuggingFace {
                repo: model_id.to_string(),
                revision: self.revision.clone(),
            }
        }
    }
}

/// Model source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace { repo: String, revision: String },
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}
