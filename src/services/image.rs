use crate::error::ImageError;
use crate::utils::sanitize_fragment;
use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const IMAGE_API_TIMEOUT: Duration = Duration::from_secs(30);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);
pub const UPLOADS_ROUTE: &str = "/uploads";
const FILENAME_FRAGMENT_LEN: usize = 20;

/// Asks an image provider for a picture and returns the URL it hosts it at.
#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn generate(&self, prompt: &str, style: &str) -> Result<Option<String>, ImageError>;
}

#[derive(Debug, Deserialize)]
struct IdeogramResponse {
    #[serde(default)]
    data: Vec<IdeogramImage>,
}

#[derive(Debug, Deserialize)]
struct IdeogramImage {
    url: Option<String>,
}

/// Maps a free-form style name onto Ideogram's fixed `style_type` values.
pub fn ideogram_style_type(style: &str) -> &'static str {
    match style.trim().to_ascii_lowercase().as_str() {
        "realistic" | "photo" | "photographic" | "photorealistic" | "cinematic" => "REALISTIC",
        "design" | "flat" | "minimal" | "minimalist" | "illustration" | "vector" | "icon" => {
            "DESIGN"
        }
        "fiction" | "fantasy" | "cartoon" | "anime" | "comic" | "sci-fi" => "FICTION",
        "general" => "GENERAL",
        _ => "AUTO",
    }
}

pub struct IdeogramClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl IdeogramClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(IMAGE_API_TIMEOUT)
            .build()?;
        Ok(IdeogramClient {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl ImageApi for IdeogramClient {
    async fn generate(&self, prompt: &str, style: &str) -> Result<Option<String>, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::MissingApiKey)?;

        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("rendering_speed", "TURBO")
            .text("style_type", ideogram_style_type(style));

        let response = self
            .client
            .post(&self.api_url)
            .header("Api-Key", api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        let body: IdeogramResponse = response.json().await?;
        Ok(body.data.into_iter().find_map(|image| image.url))
    }
}

/// `{timestamp}_{prompt fragment}_{slide index}.png`
pub fn image_filename(prompt: &str, slide_index: usize, timestamp_ms: i64) -> String {
    format!(
        "{}_{}_{}.png",
        timestamp_ms,
        sanitize_fragment(prompt, FILENAME_FRAGMENT_LEN),
        slide_index
    )
}

/// Appends the style and the no-lettering hint to a bare image prompt.
pub fn styled_prompt(prompt: &str, style: &str) -> String {
    let style = style.trim();
    if style.is_empty() {
        format!("{}, no text or lettering", prompt.trim())
    } else {
        format!("{}, {} style, no text or lettering", prompt.trim(), style)
    }
}

pub fn compose_image_prompt(title: &str, topic: &str, style: &str) -> String {
    styled_prompt(
        &format!("{} for a presentation about {}", title, topic),
        style,
    )
}

/// Generates slide art and stores it under the uploads directory.
pub struct ImageService {
    api: Arc<dyn ImageApi>,
    client: reqwest::Client,
    uploads_dir: PathBuf,
}

impl ImageService {
    pub fn new(api: Arc<dyn ImageApi>, uploads_dir: impl Into<PathBuf>) -> Result<Self, ImageError> {
        Self::with_download_timeout(api, uploads_dir, DOWNLOAD_TIMEOUT)
    }

    pub fn with_download_timeout(
        api: Arc<dyn ImageApi>,
        uploads_dir: impl Into<PathBuf>,
        download_timeout: Duration,
    ) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(download_timeout)
            .build()?;
        Ok(ImageService {
            api,
            client,
            uploads_dir: uploads_dir.into(),
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Returns the public `/uploads/...` path of the stored image, or `None` when
    /// anything along the way fails.
    pub async fn generate(&self, prompt: &str, style: &str, slide_index: usize) -> Option<String> {
        let remote_url = match self.api.generate(prompt, style).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::warn!("Image API returned no URL for slide {}", slide_index + 1);
                return None;
            }
            Err(e) => {
                tracing::warn!("Image generation failed for slide {}: {}", slide_index + 1, e);
                return None;
            }
        };

        let filename = image_filename(prompt, slide_index, chrono::Utc::now().timestamp_millis());
        match self.download(&remote_url, &filename).await {
            Ok(()) => {
                tracing::debug!("Saved image for slide {} as {}", slide_index + 1, filename);
                Some(format!("{}/{}", UPLOADS_ROUTE, filename))
            }
            Err(e) => {
                tracing::warn!("Image download failed for slide {}: {}", slide_index + 1, e);
                None
            }
        }
    }

    async fn download(&self, url: &str, filename: &str) -> Result<(), ImageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        std::fs::write(self.uploads_dir.join(filename), &bytes)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{MockImageApi, serve_image, serve_slow_image};
    use super::*;
    use axum::{Json, Router, extract::Multipart, http::HeaderMap, routing::post};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn filename_is_sanitized_and_truncated() {
        let name = image_filename("A sunny rooftop, covered in panels!", 3, 1_700_000_000_000);
        assert_eq!(name, "1700000000000_Asunnyrooftopcovered_3.png");
    }

    #[test]
    fn filename_is_pure() {
        assert_eq!(image_filename("x y", 1, 42), image_filename("x y", 1, 42));
        assert_ne!(image_filename("x y", 1, 42), image_filename("x y", 2, 42));
    }

    #[test]
    fn styles_map_onto_provider_values() {
        assert_eq!(ideogram_style_type("realistic"), "REALISTIC");
        assert_eq!(ideogram_style_type(" Photo "), "REALISTIC");
        assert_eq!(ideogram_style_type("flat"), "DESIGN");
        assert_eq!(ideogram_style_type("Fantasy"), "FICTION");
        assert_eq!(ideogram_style_type("general"), "GENERAL");
        assert_eq!(ideogram_style_type("sketch"), "AUTO");
        assert_eq!(ideogram_style_type(""), "AUTO");
    }

    #[test]
    fn prompts_carry_the_style() {
        assert_eq!(
            styled_prompt("A sunny roof", "watercolor"),
            "A sunny roof, watercolor style, no text or lettering"
        );
        assert_eq!(styled_prompt("A sunny roof", " "), "A sunny roof, no text or lettering");
        assert_eq!(
            compose_image_prompt("Benefits", "Solar Power", "sketch"),
            "Benefits for a presentation about Solar Power, sketch style, no text or lettering"
        );
    }

    #[tokio::test]
    async fn ideogram_request_is_multipart_with_api_key() {
        let seen: Arc<Mutex<(Option<String>, HashMap<String, String>)>> = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().route(
            "/generate",
            post(move |headers: HeaderMap, mut multipart: Multipart| {
                let recorder = recorder.clone();
                async move {
                    let mut fields = HashMap::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        fields.insert(name, field.text().await.unwrap());
                    }
                    let key = headers
                        .get("Api-Key")
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    *recorder.lock().unwrap() = (key, fields);
                    Json(json!({ "data": [{ "url": "http://images.local/a.png" }] }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client =
            IdeogramClient::new(format!("http://{}/generate", addr), Some("key-123".to_string()))
                .unwrap();
        let url = client.generate("A sunny roof", "realistic").await.unwrap();
        assert_eq!(url.as_deref(), Some("http://images.local/a.png"));

        let (key, fields) = seen.lock().unwrap().clone();
        assert_eq!(key.as_deref(), Some("key-123"));
        assert_eq!(fields["prompt"], "A sunny roof");
        assert_eq!(fields["rendering_speed"], "TURBO");
        assert_eq!(fields["style_type"], "REALISTIC");
    }

    #[tokio::test]
    async fn ideogram_error_status_is_an_error() {
        let app = Router::new().route(
            "/generate",
            post(|| async { (http::StatusCode::BAD_REQUEST, Json(Value::Null)) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client =
            IdeogramClient::new(format!("http://{}/generate", addr), Some("k".to_string()))
                .unwrap();
        let err = client.generate("prompt", "sketch").await.unwrap_err();
        assert!(matches!(err, ImageError::Status(400)));
    }

    #[tokio::test]
    async fn missing_key_yields_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let api = IdeogramClient::new("http://127.0.0.1:9/unused", None).unwrap();
        let err = api.generate("prompt", "style").await.unwrap_err();
        assert!(matches!(err, ImageError::MissingApiKey));

        let service = ImageService::new(Arc::new(api), dir.path()).unwrap();
        assert_eq!(service.generate("prompt", "style", 0).await, None);
    }

    #[tokio::test]
    async fn provider_failure_yields_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let service = ImageService::new(Arc::new(MockImageApi::new(None)), dir.path()).unwrap();
        assert_eq!(service.generate("prompt", "style", 1).await, None);
    }

    #[tokio::test]
    async fn downloads_and_stores_image() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_image(b"fake-png-bytes").await;
        let service = ImageService::new(Arc::new(MockImageApi::new(Some(url))), dir.path()).unwrap();

        let public = service.generate("Solar roof", "photo", 2).await.unwrap();
        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with("_Solarroof_2.png"));

        let filename = public.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(filename)).unwrap();
        assert_eq!(stored, b"fake-png-bytes");
    }

    #[tokio::test]
    async fn failed_download_yields_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_image(b"bytes").await.replace("image.png", "missing.png");
        let service = ImageService::new(Arc::new(MockImageApi::new(Some(url))), dir.path()).unwrap();
        assert_eq!(service.generate("prompt", "style", 0).await, None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn slow_download_times_out_and_yields_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_slow_image(b"bytes", Duration::from_secs(5)).await;
        let service = ImageService::with_download_timeout(
            Arc::new(MockImageApi::new(Some(url))),
            dir.path(),
            Duration::from_millis(100),
        )
        .unwrap();

        let started = std::time::Instant::now();
        assert_eq!(service.generate("prompt", "style", 0).await, None);
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unwritable_uploads_dir_yields_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_image(b"bytes").await;
        let service = ImageService::new(
            Arc::new(MockImageApi::new(Some(url))),
            dir.path().join("does-not-exist"),
        )
        .unwrap();
        assert_eq!(service.generate("prompt", "style", 0).await, None);
    }
}
