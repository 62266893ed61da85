use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        generation_client::{GenerationClient, GenerationSettings, OpenAiGenerationClient},
        quiz_pipeline_service::QuizPipelineService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_pipeline: Arc<QuizPipelineService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = OpenAiGenerationClient::new(GenerationSettings::from(&config));
        log::info!(
            "Using generation model '{}' at {}",
            client.model(),
            config.model_api_base
        );

        Self::with_client(config, Arc::new(client))
    }

    /// Builds the state around an arbitrary generation client.
    pub fn with_client(config: Config, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            quiz_pipeline: Arc::new(QuizPipelineService::new(client)),
            config: Arc::new(config),
        }
    }
}
