use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{DocumentStore, LocalDocumentStore},
    services::{
        generation_service::GenerationService,
        model_service::{ContentModel, OpenAiContentModel},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<GenerationService>,
    pub document_store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let document_store = Arc::new(LocalDocumentStore::new(config.storage_dir.clone()));
        document_store.ensure_root().await?;
        log::info!("Document storage root: {}", config.storage_dir.display());

        let model = Arc::new(OpenAiContentModel::new(&config));

        Ok(Self::with_components(config, model, document_store))
    }

    /// Wires the state around an explicit model and store.
    pub fn with_components(
        config: Config,
        model: Arc<dyn ContentModel>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        let generation_service = Arc::new(GenerationService::new(model, document_store.clone()));

        Self {
            generation_service,
            document_store,
            config: Arc::new(config),
        }
    }
}
