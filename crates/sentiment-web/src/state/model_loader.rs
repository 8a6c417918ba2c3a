use crate::state::StateStore;
use sentiment_classifiers::{Classifier, ModelBackend};
use sentiment_core::LoadState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Acquires the classifier once per surface lifetime and owns the handle.
///
/// There is no retry: once `Failed`, the surface stays without a model until
/// it is restarted. There is no timeout either; a backend that never resolves
/// leaves the surface busy.
pub struct ModelLoader {
    backend: Arc<dyn ModelBackend>,
    model_id: String,
    store: Arc<StateStore>,
    handle: OnceLock<Arc<dyn Classifier>>,
    started: AtomicBool,
    load_state: watch::Sender<LoadState>,
}

impl ModelLoader {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        model_id: impl Into<String>,
        store: Arc<StateStore>,
    ) -> Self {
        let (load_state, _) = watch::channel(LoadState::Loading);
        Self {
            backend,
            model_id: model_id.into(),
            store,
            handle: OnceLock::new(),
            started: AtomicBool::new(false),
            load_state,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn load_state(&self) -> LoadState {
        *self.load_state.borrow()
    }

    /// The shared classifier, once acquisition succeeded
    pub fn handle(&self) -> Option<Arc<dyn Classifier>> {
        self.handle.get().cloned()
    }

    /// Acquire the model. Only the first call does anything; later calls
    /// return the current state without touching the backend.
    pub async fn initialize(&self) -> LoadState {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!(model_id = %self.model_id, "Model loader already started");
            return self.load_state();
        }

        self.store.update(|s| {
            s.busy = true;
            s.load_state = LoadState::Loading;
        });

        tracing::info!(
            model_id = %self.model_id,
            backend = self.backend.name(),
            "Loading sentiment model"
        );

        let state = match self.backend.load_model(&self.model_id).await {
            Ok(handle) => {
                let _ = self.handle.set(handle);
                tracing::info!(model_id = %self.model_id, "Model initialized successfully");
                LoadState::Ready
            }
            Err(e) => {
                tracing::error!(model_id = %self.model_id, error = %e, "Failed to load the model");
                LoadState::Failed
            }
        };

        self.store.update(|s| {
            s.load_state = state;
            s.busy = false;
        });
        self.load_state.send_replace(state);

        state
    }

    /// Start acquisition in the background
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<LoadState> {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.initialize().await })
    }

    /// Wait until acquisition reached `Ready` or `Failed`
    pub async fn wait_until_settled(&self) -> LoadState {
        let mut rx = self.load_state.subscribe();
        let settled = match rx.wait_for(|state| state.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.load_state(),
        };
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EventBus;
    use async_trait::async_trait;
    use sentiment_classifiers::{ClassificationResult, LexiconBackend};
    use sentiment_core::{Error, Result};

    struct RejectingBackend;

    #[async_trait]
    impl ModelBackend for RejectingBackend {
        async fn load_model(&self, _model_id: &str) -> Result<Arc<dyn Classifier>> {
            Err(Error::acquisition("offline"))
        }

        fn name(&self) -> &str {
            "rejecting"
        }
    }

    fn loader(backend: Arc<dyn ModelBackend>) -> (Arc<StateStore>, ModelLoader) {
        let store = Arc::new(StateStore::new(Arc::new(EventBus::default())));
        let loader = ModelLoader::new(backend, "test-model", Arc::clone(&store));
        (store, loader)
    }

    #[tokio::test]
    async fn test_initialize_success() {
        let (store, loader) = loader(Arc::new(LexiconBackend::new()));
        assert_eq!(loader.load_state(), LoadState::Loading);
        assert!(loader.handle().is_none());

        assert_eq!(loader.initialize().await, LoadState::Ready);

        let handle = loader.handle().unwrap();
        let candidates: Vec<ClassificationResult> = handle.classify("great").await.unwrap();
        assert_eq!(candidates[0].label, "POSITIVE");
        assert!(store.read(|s| !s.busy && s.load_state == LoadState::Ready));
    }

    #[tokio::test]
    async fn test_initialize_failure() {
        let (store, loader) = loader(Arc::new(RejectingBackend));

        assert_eq!(loader.initialize().await, LoadState::Failed);
        assert!(loader.handle().is_none());
        assert!(store.read(|s| !s.busy && s.load_state == LoadState::Failed));
        assert!(!store.read(|s| s.analyze_enabled()));
    }

    #[tokio::test]
    async fn test_second_initialize_is_ignored() {
        let (_, loader) = loader(Arc::new(RejectingBackend));

        assert_eq!(loader.initialize().await, LoadState::Failed);
        assert_eq!(loader.initialize().await, LoadState::Failed);
    }

    #[tokio::test]
    async fn test_wait_until_settled() {
        let (_, loader) = loader(Arc::new(LexiconBackend::new()));
        let loader = Arc::new(loader);

        let task = loader.spawn_initialize();
        assert_eq!(loader.wait_until_settled().await, LoadState::Ready);
        assert_eq!(task.await.unwrap(), LoadState::Ready);
    }
}
