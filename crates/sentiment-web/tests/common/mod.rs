//! Stub classifier capabilities shared by the surface tests

#![allow(dead_code)]

use async_trait::async_trait;
use sentiment_classifiers::{ClassificationResult, Classifier, ModelBackend};
use sentiment_core::{Error, LoadState, Result};
use sentiment_web::config::SurfaceConfig;
use sentiment_web::state::SurfaceAppState;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Returns a fixed answer, or a fixed failure
pub struct StubClassifier {
    reply: std::result::Result<Vec<(String, f32)>, String>,
    calls: AtomicU32,
}

impl StubClassifier {
    pub fn answering(label: &str, score: f32) -> Self {
        Self {
            reply: Ok(vec![(label.to_string(), score)]),
            calls: AtomicU32::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            reply: Ok(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassificationResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(candidates) => Ok(candidates
                .iter()
                .map(|(label, score)| ClassificationResult::new(label.clone(), *score))
                .collect()),
            Err(message) => Err(Error::inference(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Holds every call until released and panics on overlapping calls
pub struct GatedClassifier {
    label: String,
    score: f32,
    in_flight: AtomicBool,
    calls: AtomicU32,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedClassifier {
    pub fn new(label: &str, score: f32) -> Self {
        Self {
            label: label.to_string(),
            score,
            in_flight: AtomicBool::new(false),
            calls: AtomicU32::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for GatedClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassificationResult>> {
        assert!(
            !self.in_flight.swap(true, Ordering::SeqCst),
            "classifier invoked while a previous call was unresolved"
        );
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        self.release.notified().await;

        self.in_flight.store(false, Ordering::SeqCst);
        Ok(vec![ClassificationResult::new(self.label.clone(), self.score)])
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Hands out a fixed classifier, fails, or waits for a release
pub struct StubBackend {
    classifier: Option<Arc<dyn Classifier>>,
    gate: Option<Arc<Notify>>,
    loads: AtomicU32,
}

impl StubBackend {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
            gate: None,
            loads: AtomicU32::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            classifier: None,
            gate: None,
            loads: AtomicU32::new(0),
        }
    }

    /// Resolves only once `gate` is notified
    pub fn gated(classifier: Arc<dyn Classifier>, gate: Arc<Notify>) -> Self {
        Self {
            classifier: Some(classifier),
            gate: Some(gate),
            loads: AtomicU32::new(0),
        }
    }

    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelBackend for StubBackend {
    async fn load_model(&self, _model_id: &str) -> Result<Arc<dyn Classifier>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.classifier
            .clone()
            .ok_or_else(|| Error::acquisition("stub acquisition failure"))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// A surface whose model has loaded
pub async fn ready_surface(classifier: Arc<dyn Classifier>) -> SurfaceAppState {
    let state = SurfaceAppState::new(
        SurfaceConfig::default(),
        Arc::new(StubBackend::new(classifier)),
    );
    assert_eq!(state.loader.initialize().await, LoadState::Ready);
    state
}
