use serde::{Deserialize, Serialize};

/// How much text the user wants on each slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AmountOfText {
    #[serde(alias = "minimal")]
    Minimal,
    #[serde(alias = "concise")]
    Concise,
    #[default]
    #[serde(alias = "detailed")]
    Detailed,
    #[serde(alias = "extensive")]
    Extensive,
}

#[cfg(test)]
impl AmountOfText {
    pub const ALL: [AmountOfText; 4] = [
        AmountOfText::Minimal,
        AmountOfText::Concise,
        AmountOfText::Detailed,
        AmountOfText::Extensive,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSource {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(rename = "AI", alias = "ai", alias = "Ideogram", alias = "ideogram")]
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    ImageLeft,
    ImageRight,
    ImageBottom,
    TextOnly,
}

impl Layout {
    pub const ALL: [Layout; 4] = [
        Layout::ImageLeft,
        Layout::ImageRight,
        Layout::ImageBottom,
        Layout::TextOnly,
    ];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineEntry {
    #[serde(default)]
    pub title: Option<String>,
}

impl OutlineEntry {
    /// The trimmed title, if the entry carries a non-blank one.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_image_style() -> String {
    "realistic".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub title: String,
    #[serde(default)]
    pub outline: Vec<OutlineEntry>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub amount_of_text: AmountOfText,
    #[serde(default)]
    pub slide_count: usize,
    #[serde(default)]
    pub image_source: ImageSource,
    #[serde(default = "default_image_style")]
    pub image_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideImage {
    pub url: String,
    pub alt: String,
    pub source: ImageSource,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRecord {
    pub id: String,
    pub title: String,
    pub bullets: Vec<String>,
    pub layout: Layout,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<SlideImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMeta {
    pub title: String,
    pub theme: String,
    pub amount_of_text: AmountOfText,
    pub image_source: ImageSource,
    pub image_style: String,
}

impl From<&GenerationRequest> for DeckMeta {
    fn from(request: &GenerationRequest) -> Self {
        DeckMeta {
            title: request.title.clone(),
            theme: request.theme.clone(),
            amount_of_text: request.amount_of_text,
            image_source: request.image_source,
            image_style: request.image_style.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    pub slides: Vec<SlideRecord>,
    pub meta: DeckMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default = "default_image_style")]
    pub style: String,
    #[serde(default)]
    pub slide_index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: Option<String>,
}
