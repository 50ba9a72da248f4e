use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_URL: &str = "https://api.ideogram.ai/v1/ideogram-v3/generate";
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";

/// Everything the service reads from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion_api_key: Option<String>,
    pub completion_api_url: String,
    pub model: String,
    pub image_api_key: Option<String>,
    pub image_api_url: String,
    pub uploads_dir: PathBuf,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            completion_api_key: None,
            completion_api_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            image_api_key: None,
            image_api_url: DEFAULT_IMAGE_URL.to_string(),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = AppConfig::default();

        let port = match var("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            None => defaults.port,
        };

        Ok(AppConfig {
            completion_api_key: var("OPENAI_API_KEY"),
            completion_api_url: var("OPENAI_API_URL").unwrap_or(defaults.completion_api_url),
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
            image_api_key: var("IDEOGRAM_API_KEY"),
            image_api_url: var("IDEOGRAM_API_URL").unwrap_or(defaults.image_api_url),
            uploads_dir: var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            port,
        })
    }

    /// Creates the uploads directory. Called once before the server starts.
    pub fn init(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.uploads_dir)?;
        tracing::info!("Uploads directory ready at {}", self.uploads_dir.display());
        Ok(())
    }
}
