use crate::models::{AnalyzeOutcome, Notice, RejectReason, SurfaceEvent, SurfaceSnapshot, SurfaceState};
use crate::state::{ModelLoader, StateStore};
use sentiment_classifiers::{top_prediction, Classifier};
use sentiment_core::{LoadState, SentimentResult};
use std::sync::Arc;
use uuid::Uuid;

/// Mediates the user actions on the surface: edit, analyze and clear.
///
/// At most one inference is in flight: the analyze preconditions are checked
/// and `busy` is raised under a single store lock, and `busy` is only lowered
/// once the dispatched call resolved.
pub struct InteractionController {
    store: Arc<StateStore>,
    loader: Arc<ModelLoader>,
}

impl InteractionController {
    pub fn new(store: Arc<StateStore>, loader: Arc<ModelLoader>) -> Self {
        Self { store, loader }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.store.snapshot()
    }

    /// Replace the input text
    pub fn on_input_change(&self, text: impl Into<String>) {
        let text = text.into();
        self.store.update(|s| s.input_text = text);
    }

    /// Clear the input and the displayed result
    pub fn on_clear(&self) {
        self.store.update(|s| {
            s.input_text.clear();
            s.result = None;
        });
    }

    /// Run one analysis of the current input.
    ///
    /// Rejected requests publish a notice and leave the state untouched.
    /// Dispatched requests always end with `busy` lowered and a result stored,
    /// either the top candidate or the failure sentinel.
    pub async fn on_analyze(&self) -> AnalyzeOutcome {
        let dispatched = self.store.try_update(|s| -> Result<_, RejectReason> {
            // The loader stores its handle before publishing Ready, so a
            // lookup under the store lock agrees with `s.load_state`.
            let handle = validate(s, self.loader.handle())?;
            s.result = None;
            s.busy = true;
            Ok((s.input_text.clone(), handle))
        });

        let (text, handle) = match dispatched {
            Ok(dispatched) => dispatched,
            Err(reason) => return self.reject(reason),
        };

        let analysis_id = Uuid::new_v4();
        tracing::debug!(%analysis_id, chars = text.chars().count(), "Dispatching analysis");

        let outcome = match handle.classify(&text).await.and_then(top_prediction) {
            Ok(top) => {
                let model = top.metadata.model.clone().unwrap_or_else(|| handle.name().to_string());
                let latency_us = top.latency_us;
                let result = SentimentResult::from(top);
                tracing::info!(
                    %analysis_id,
                    %model,
                    label = %result.label,
                    score = result.score,
                    latency_us,
                    "Analysis resolved"
                );
                AnalyzeOutcome::Resolved { result }
            }
            Err(e) => {
                tracing::error!(%analysis_id, error = %e, "Sentiment analysis failed");
                AnalyzeOutcome::Failed {
                    result: SentimentResult::failed(),
                }
            }
        };

        let stored = outcome.result().cloned();
        self.store.update(|s| {
            s.result = stored;
            s.busy = false;
        });

        outcome
    }

    fn reject(&self, reason: RejectReason) -> AnalyzeOutcome {
        tracing::debug!(?reason, "Analyze request rejected");
        self.store
            .events()
            .publish(SurfaceEvent::Notice(Notice::rejected(reason)));
        AnalyzeOutcome::Rejected { reason }
    }
}

/// Analyze preconditions. Yields the classifier to dispatch to.
fn validate(
    state: &SurfaceState,
    handle: Option<Arc<dyn Classifier>>,
) -> Result<Arc<dyn Classifier>, RejectReason> {
    let handle = match handle {
        Some(handle) if state.load_state == LoadState::Ready => handle,
        _ => return Err(RejectReason::ModelNotReady),
    };
    if state.busy {
        return Err(RejectReason::Busy);
    }
    if state.input_text.trim().is_empty() {
        return Err(RejectReason::EmptyInput);
    }
    Ok(handle)
}
