use std::sync::Arc;

use crate::{
    backend::InferenceBackend, config::Settings, metrics::AppMetrics, orchestrator::Orchestrator,
};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn InferenceBackend>,
    pub orchestrator: Arc<Orchestrator>,
    pub settings: Arc<Settings>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new<B>(backend: Arc<B>, settings: Settings) -> Self
    where
        B: InferenceBackend + 'static,
    {
        let backend: Arc<dyn InferenceBackend> = backend;
        let orchestrator = Arc::new(Orchestrator::new(backend.clone(), settings.language));
        Self {
            backend,
            orchestrator,
            settings: Arc::new(settings),
            metrics: Arc::new(AppMetrics::new()),
        }
    }
}
