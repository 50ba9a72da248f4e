use crate::error::LlmError;
use crate::models::AmountOfText;
use crate::services::outline::MAX_SLIDE_COUNT;
use crate::services::prompts::{self, ContentPolicy, SlideRole};
use crate::utils::strip_code_fences;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const OUTLINE_TEMPERATURE: f32 = 0.9;
pub const CONTENT_TEMPERATURE: f32 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    fn new(model: &str, system: &str, user: String, temperature: f32, max_tokens: u32) -> Self {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// A single chat-completion round trip returning the first choice's text.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        OpenAiClient {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Output of a generation step: either what the model produced or a fixed fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation<T> {
    Model(T),
    Fallback { value: T, reason: String },
}

impl<T> Generation<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Generation::Model(_) => None,
            Generation::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Generation::Model(value) | Generation::Fallback { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Generation::Model(value) | Generation::Fallback { value, .. } => value,
        }
    }
}

pub fn fallback_outline(topic: &str) -> Vec<String> {
    vec![
        format!("Introduction to {}", topic),
        format!("Key Aspects of {}", topic),
        format!("Conclusion: {}", topic),
    ]
}

pub fn fallback_content(index: usize, title: &str) -> Vec<String> {
    match SlideRole::for_index(index) {
        SlideRole::Feature => vec![
            format!("Key point about {}", title),
            format!("Another important aspect of {}", title),
        ],
        SlideRole::Opening | SlideRole::Standard => {
            vec![format!("Content for {} will be available soon.", title)]
        }
    }
}

/// Pulls the title list out of an outline reply: strings or `{"title": ...}` objects.
pub fn parse_outline(raw: &str) -> Result<Vec<String>, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    let Value::Array(items) = value else {
        return Err(LlmError::Shape("outline is not a JSON array".to_string()));
    };

    let titles: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(title) => Some(title.as_str()),
            Value::Object(map) => map.get("title").and_then(Value::as_str),
            _ => None,
        })
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect();

    if titles.is_empty() {
        return Err(LlmError::Shape("outline contained no titles".to_string()));
    }
    Ok(titles)
}

/// Pulls the content strings out of a slide reply and caps them at `max_items`.
pub fn parse_content(raw: &str, max_items: usize) -> Result<Vec<String>, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    let Value::Object(map) = value else {
        return Err(LlmError::Shape("slide content is not a JSON object".to_string()));
    };

    let entries = map
        .get("bullets")
        .and_then(Value::as_array)
        .or_else(|| map.get("paragraphs").and_then(Value::as_array))
        .ok_or_else(|| LlmError::Shape("missing bullets or paragraphs array".to_string()))?;

    let content: Vec<String> = entries
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .take(max_items)
        .map(str::to_string)
        .collect();

    if content.is_empty() {
        return Err(LlmError::Shape("content array was empty".to_string()));
    }
    Ok(content)
}

/// Turns completion calls into outline titles and slide text, falling back on any failure.
pub struct TextGenerator {
    api: Arc<dyn CompletionApi>,
    model: String,
}

impl TextGenerator {
    pub fn new(api: Arc<dyn CompletionApi>, model: impl Into<String>) -> Self {
        TextGenerator {
            api,
            model: model.into(),
        }
    }

    pub async fn generate_outline(&self, topic: &str, count: usize) -> Generation<Vec<String>> {
        let count = count.min(MAX_SLIDE_COUNT);
        let request = CompletionRequest::new(
            &self.model,
            prompts::OUTLINE_SYSTEM_PROMPT,
            prompts::build_outline_prompt(topic, count),
            OUTLINE_TEMPERATURE,
            prompts::OUTLINE_MAX_TOKENS,
        );

        let result = match self.api.complete(&request).await {
            Ok(raw) => parse_outline(&raw),
            Err(e) => Err(e),
        };

        match result {
            Ok(mut titles) => {
                titles.truncate(count);
                while titles.len() < count {
                    titles.push(format!("{} - Part {}", topic, titles.len() + 1));
                }
                Generation::Model(titles)
            }
            Err(e) => {
                tracing::warn!("Outline generation failed, using fallback titles: {}", e);
                Generation::Fallback {
                    value: fallback_outline(topic),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn generate_slide_content(
        &self,
        index: usize,
        title: &str,
        topic: &str,
        amount: AmountOfText,
    ) -> Generation<Vec<String>> {
        let prompt = prompts::build_slide_prompt(index, title, topic, amount);
        let request = CompletionRequest::new(
            &self.model,
            prompts::CONTENT_SYSTEM_PROMPT,
            prompt.text,
            CONTENT_TEMPERATURE,
            prompt.max_tokens,
        );

        let result = match self.api.complete(&request).await {
            Ok(raw) => parse_content(&raw, prompt.policy.max_items),
            Err(e) => Err(e),
        };

        match result {
            Ok(content) => Generation::Model(content),
            Err(e) => {
                tracing::warn!(
                    "Content generation for slide {} failed, using placeholder: {}",
                    index + 1,
                    e
                );
                let mut value = fallback_content(index, title);
                value.truncate(ContentPolicy::for_slide(index, amount).max_items);
                Generation::Fallback {
                    value,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Replies to outline requests and content requests with fixed strings.
    /// `None` makes the corresponding call fail.
    #[derive(Default)]
    pub struct MockCompletionApi {
        pub outline_reply: Option<String>,
        pub content_reply: Option<String>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockCompletionApi {
        pub fn replying(outline: &str, content: &str) -> Self {
            MockCompletionApi {
                outline_reply: Some(outline.to_string()),
                content_reply: Some(content.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            MockCompletionApi::default()
        }
    }

    #[async_trait]
    impl CompletionApi for MockCompletionApi {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            let reply = if request.temperature == OUTLINE_TEMPERATURE {
                &self.outline_reply
            } else {
                &self.content_reply
            };
            reply.clone().ok_or(LlmError::EmptyContent)
        }
    }
}
