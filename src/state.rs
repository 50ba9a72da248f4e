use crate::config::AppConfig;
use crate::error::ImageError;
use crate::services::image::{IdeogramClient, ImageService};
use crate::services::llm::{OpenAiClient, TextGenerator};
use std::sync::Arc;

/// Shared handles passed to every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub text: Arc<TextGenerator>,
    pub images: Arc<ImageService>,
}

impl AppState {
    pub fn new(text: TextGenerator, images: ImageService) -> Self {
        AppState {
            text: Arc::new(text),
            images: Arc::new(images),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ImageError> {
        if config.completion_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; slide text will use placeholders");
        }
        if config.image_api_key.is_none() {
            tracing::warn!("IDEOGRAM_API_KEY is not set; slides will be generated without images");
        }

        let completion = OpenAiClient::new(
            config.completion_api_url.clone(),
            config.completion_api_key.clone(),
        );
        let image_api =
            IdeogramClient::new(config.image_api_url.clone(), config.image_api_key.clone())?;

        Ok(AppState::new(
            TextGenerator::new(Arc::new(completion), config.model.clone()),
            ImageService::new(Arc::new(image_api), config.uploads_dir.clone())?,
        ))
    }
}
