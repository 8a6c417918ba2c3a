use crate::config::SurfaceConfig;
use crate::state::{EventBus, InteractionController, ModelLoader, StateStore};
use sentiment_classifiers::ModelBackend;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct SurfaceAppState {
    /// Surface configuration
    pub config: Arc<SurfaceConfig>,

    /// Real-time event bus for WebSocket broadcasting
    pub event_bus: Arc<EventBus>,

    /// Owner of the user-visible state
    pub store: Arc<StateStore>,

    /// Model acquisition and the classifier handle
    pub loader: Arc<ModelLoader>,

    /// Edit / analyze / clear actions
    pub controller: Arc<InteractionController>,
}

impl SurfaceAppState {
    pub fn new(config: SurfaceConfig, backend: Arc<dyn ModelBackend>) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let store = Arc::new(StateStore::new(Arc::clone(&event_bus)));
        let loader = Arc::new(ModelLoader::new(
            backend,
            config.model.id.clone(),
            Arc::clone(&store),
        ));
        let controller = Arc::new(InteractionController::new(
            Arc::clone(&store),
            Arc::clone(&loader),
        ));

        Self {
            config: Arc::new(config),
            event_bus,
            store,
            loader,
            controller,
        }
    }

    /// Build the state with the backend named in the configuration
    pub fn from_config(config: SurfaceConfig) -> Self {
        let backend = sentiment_classifiers::build_backend(config.backend, &config.model);
        Self::new(config, backend)
    }
}
