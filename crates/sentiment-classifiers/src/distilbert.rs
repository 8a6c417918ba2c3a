//! DistilBERT sequence classification with Candle
//!
//! Weights are resolved from a local directory or downloaded from the
//! Hugging Face hub, then memory-mapped from `model.safetensors`. Loading and
//! the forward pass are CPU/GPU bound and run on tokio's blocking pool.

use crate::backend::ModelBackend;
use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::model_config::{ModelConfig, ModelSource};
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use sentiment_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationDirection};

/// Candle/HuggingFace-backed model acquisition.
pub struct CandleBackend {
    config: ModelConfig,
}

impl CandleBackend {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ModelBackend for CandleBackend {
    async fn load_model(&self, model_id: &str) -> Result<Arc<dyn Classifier>> {
        let config = self.config.clone();
        let model_id = model_id.to_string();

        let classifier = tokio::task::spawn_blocking(move || {
            DistilBertSentimentClassifier::load(&config, &model_id)
        })
        .await
        .map_err(|e| Error::acquisition(format!("Model loading task panicked: {}", e)))??;

        Ok(Arc::new(classifier))
    }

    fn name(&self) -> &str {
        "candle"
    }
}

/// DistilBERT with the `pre_classifier` + `classifier` sequence head
pub struct DistilBertSentimentClassifier {
    inner: Arc<DistilBertInner>,
}

struct DistilBertInner {
    name: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
    max_length: usize,
}

impl DistilBertSentimentClassifier {
    /// Resolve, download if needed, and load the model. Blocking.
    pub fn load(config: &ModelConfig, model_id: &str) -> Result<Self> {
        let model_path = resolve_model_dir(&config.source_for(model_id), &config.cache_dir())?;
        let tokenizer = load_tokenizer(&model_path)?;

        let config_str = std::fs::read_to_string(model_path.join("config.json"))
            .map_err(|e| Error::acquisition(format!("Failed to read config.json: {}", e)))?;
        let config_json: serde_json::Value = serde_json::from_str(&config_str)
            .map_err(|e| Error::acquisition(format!("Failed to parse config JSON: {}", e)))?;
        let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::acquisition(format!("Failed to parse config: {}", e)))?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;

        let labels = resolve_labels(&config.labels, &config_json);

        let device = get_device(&config.inference.device)?;
        let vb = load_var_builder(&model_path, &device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(|e| Error::acquisition(format!("Failed to load DistilBERT model: {}", e)))?;

        let pre_classifier =
            candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
        if pre_classifier.is_none() {
            tracing::warn!("No pre_classifier layer found, using the CLS embedding directly");
        }

        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(|e| {
                Error::acquisition(format!("Failed to load classification head: {}", e))
            })?;

        tracing::info!(
            model_id,
            num_labels = labels.len(),
            "Loaded DistilBERT classifier with labels {:?}",
            labels
        );

        Ok(Self {
            inner: Arc::new(DistilBertInner {
                name: model_id.to_string(),
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
                max_length: config.inference.max_length,
            }),
        })
    }
}

impl DistilBertInner {
    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>> {
        let start = Instant::now();

        let mut encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("Tokenization failed: {}", e)))?;
        encoding.truncate(self.max_length, 0, TruncationDirection::Right);

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("Failed to create input tensor: {}", e)))?;

        // DistilBERT masks positions where the mask is 1
        let attention_mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| if x == 0 { 1u8 } else { 0u8 })
            .collect();
        let attention_mask = Tensor::new(attention_mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("Failed to create attention mask: {}", e)))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))?;

        let cls_embedding = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("Failed to get CLS token: {}", e)))?;

        let pooled_output = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls_embedding)
                .and_then(|t| t.relu())
                .map_err(|e| Error::inference(format!("Pre-classifier failed: {}", e)))?,
            None => cls_embedding,
        };

        let logits = self
            .classifier
            .forward(&pooled_output)
            .map_err(|e| Error::inference(format!("Classification head failed: {}", e)))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1())
            .map_err(|e| Error::inference(format!("Softmax failed: {}", e)))?;

        let latency_us = start.elapsed().as_micros() as u64;
        Ok(ranked_candidates(&self.name, &self.labels, &probs, latency_us))
    }
}

#[async_trait]
impl Classifier for DistilBertSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationResult>> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || inner.predict(&text))
            .await
            .map_err(|e| Error::inference(format!("Inference task panicked: {}", e)))?
    }

    fn name(&self) -> &str {
        &self.inner.name
    }
}

fn resolve_model_dir(source: &ModelSource, cache_dir: &Path) -> Result<PathBuf> {
    match source {
        ModelSource::Local { path } => {
            if !path.join("config.json").exists() {
                return Err(Error::acquisition(format!(
                    "config.json not found in {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => {
            download_from_huggingface(repo, revision, cache_dir)
        }
    }
}

fn download_from_huggingface(repo: &str, revision: &str, cache_dir: &Path) -> Result<PathBuf> {
    tracing::info!("Downloading model from HuggingFace: {} ({})", repo, revision);

    std::fs::create_dir_all(cache_dir).map_err(|e| {
        Error::acquisition(format!(
            "Failed to create model cache {}: {}",
            cache_dir.display(),
            e
        ))
    })?;
    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
        .map_err(|e| Error::acquisition(format!("Failed to initialize HuggingFace API: {}", e)))?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::acquisition(format!("Failed to download config.json: {}", e)))?;

    repo_obj.get("model.safetensors").map_err(|e| {
        Error::acquisition(format!("Failed to download model.safetensors: {}", e))
    })?;

    // Either file is enough to build the tokenizer
    let mut found_tokenizer = false;
    for file in ["tokenizer.json", "vocab.txt"] {
        match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                found_tokenizer = true;
            }
            Err(_) => tracing::debug!("File not found: {}", file),
        }
    }
    if !found_tokenizer {
        return Err(Error::acquisition(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::acquisition("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::acquisition(format!("Failed to initialize CUDA: {}", e))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::acquisition(format!("Failed to initialize Metal: {}", e))),
        _ => Ok(Device::Cpu),
    }
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::acquisition(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is not modified while mapped
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::acquisition(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::acquisition(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::acquisition(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
        tokenizer.with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), 102),
            ("[CLS]".to_string(), 101),
        )));

        return Ok(tokenizer);
    }

    Err(Error::acquisition(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_path.display()
    )))
}

/// Configured labels win; otherwise `id2label` from `config.json`; otherwise
/// the SST-2 pair.
fn resolve_labels(configured: &[String], config_json: &serde_json::Value) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }

    let mut indexed: Vec<(usize, String)> = config_json
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(idx, label)| Some((idx.parse().ok()?, label.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    if indexed.is_empty() {
        return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
    }

    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, label)| label).collect()
}

/// Pair probabilities with labels, best first
fn ranked_candidates(
    name: &str,
    labels: &[String],
    probs: &[f32],
    latency_us: u64,
) -> Vec<ClassificationResult> {
    let mut ranked: Vec<(String, f32)> = probs
        .iter()
        .enumerate()
        .map(|(idx, &p)| {
            let label = labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{}", idx));
            (label, p)
        })
        .collect();

    ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .map(|(label, score)| ClassificationResult {
            label,
            score,
            metadata: ClassificationMetadata {
                model: Some(name.to_string()),
            },
            latency_us,
        })
        .collect()
}
