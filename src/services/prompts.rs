//! Prompt construction for outline and slide-content requests.
//!
//! Slide prompts are driven by a fixed policy table keyed by [`SlideRole`] and
//! [`AmountOfText`]. The opening slide is always a short hook and the third slide
//! is always a bullet list; every other slide gets one or two paragraphs.

use crate::models::AmountOfText;

pub const OUTLINE_SYSTEM_PROMPT: &str = "You are an expert presentation designer. \
You write clear, engaging slide titles and always answer with valid JSON only.";

pub const CONTENT_SYSTEM_PROMPT: &str = "You are an expert presentation writer. \
You write concise, informative slide text and always answer with valid JSON only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Opening,
    Feature,
    Standard,
}

impl SlideRole {
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => SlideRole::Opening,
            2 => SlideRole::Feature,
            _ => SlideRole::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShape {
    Hook,
    Bullets,
    Paragraphs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPolicy {
    pub shape: ContentShape,
    pub min_items: usize,
    pub max_items: usize,
    pub min_words: usize,
    pub max_words: usize,
    pub max_tokens: u32,
}

const fn policy(
    shape: ContentShape,
    items: (usize, usize),
    words: (usize, usize),
    max_tokens: u32,
) -> ContentPolicy {
    ContentPolicy {
        shape,
        min_items: items.0,
        max_items: items.1,
        min_words: words.0,
        max_words: words.1,
        max_tokens,
    }
}

const OPENING: ContentPolicy = policy(ContentShape::Hook, (1, 1), (25, 45), 250);

const FEATURE_EXTENSIVE: ContentPolicy = policy(ContentShape::Bullets, (4, 6), (8, 15), 200);
const FEATURE_DETAILED: ContentPolicy = policy(ContentShape::Bullets, (3, 5), (6, 12), 170);
const FEATURE_CONCISE: ContentPolicy = policy(ContentShape::Bullets, (3, 4), (5, 10), 150);
const FEATURE_MINIMAL: ContentPolicy = policy(ContentShape::Bullets, (2, 3), (5, 8), 120);

const STANDARD_EXTENSIVE: ContentPolicy = policy(ContentShape::Paragraphs, (1, 2), (60, 90), 300);
const STANDARD_DETAILED: ContentPolicy = policy(ContentShape::Paragraphs, (1, 2), (40, 60), 220);
const STANDARD_CONCISE: ContentPolicy = policy(ContentShape::Paragraphs, (1, 1), (30, 45), 150);
const STANDARD_MINIMAL: ContentPolicy = policy(ContentShape::Paragraphs, (1, 1), (15, 25), 100);

impl ContentPolicy {
    pub fn lookup(role: SlideRole, amount: AmountOfText) -> ContentPolicy {
        use AmountOfText::*;
        match (role, amount) {
            (SlideRole::Opening, _) => OPENING,
            (SlideRole::Feature, Extensive) => FEATURE_EXTENSIVE,
            (SlideRole::Feature, Detailed) => FEATURE_DETAILED,
            (SlideRole::Feature, Concise) => FEATURE_CONCISE,
            (SlideRole::Feature, Minimal) => FEATURE_MINIMAL,
            (SlideRole::Standard, Extensive) => STANDARD_EXTENSIVE,
            (SlideRole::Standard, Detailed) => STANDARD_DETAILED,
            (SlideRole::Standard, Concise) => STANDARD_CONCISE,
            (SlideRole::Standard, Minimal) => STANDARD_MINIMAL,
        }
    }

    pub fn for_slide(index: usize, amount: AmountOfText) -> ContentPolicy {
        Self::lookup(SlideRole::for_index(index), amount)
    }

    /// JSON key the model is asked to put its content under.
    pub fn response_key(&self) -> &'static str {
        match self.shape {
            ContentShape::Bullets => "bullets",
            ContentShape::Hook | ContentShape::Paragraphs => "paragraphs",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlidePrompt {
    pub text: String,
    pub max_tokens: u32,
    pub policy: ContentPolicy,
}

fn range_text(min: usize, max: usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{}-{}", min, max)
    }
}

pub fn build_slide_prompt(
    index: usize,
    title: &str,
    topic: &str,
    amount: AmountOfText,
) -> SlidePrompt {
    let policy = ContentPolicy::for_slide(index, amount);
    let words = range_text(policy.min_words, policy.max_words);

    let instructions = match policy.shape {
        ContentShape::Hook => format!(
            "Write the opening slide titled \"{}\" for a presentation about \"{}\".\n\
             Write a single engaging paragraph of {} words that hooks the audience \
             with a surprising fact, a question, or a vivid image.",
            title, topic, words
        ),
        ContentShape::Bullets => format!(
            "Write the content for the slide titled \"{}\" in a presentation about \"{}\".\n\
             Write {} bullet points of {} words each. Each bullet must state one concrete \
             point; do not number them or add leading symbols.",
            title,
            topic,
            range_text(policy.min_items, policy.max_items),
            words
        ),
        ContentShape::Paragraphs => {
            let paragraphs = if policy.max_items == 1 {
                "one paragraph".to_string()
            } else {
                format!("{} paragraphs", range_text(policy.min_items, policy.max_items))
            };
            format!(
                "Write the content for the slide titled \"{}\" in a presentation about \"{}\".\n\
                 Write {} of {} words each, informative and easy to read aloud.",
                title, topic, paragraphs, words
            )
        }
    };

    let text = format!(
        "{}\n\nRespond with JSON only: {{\"{}\": [\"...\"]}}",
        instructions,
        policy.response_key()
    );

    SlidePrompt {
        text,
        max_tokens: policy.max_tokens,
        policy,
    }
}

pub const OUTLINE_MAX_TOKENS: u32 = 500;

pub fn build_outline_prompt(topic: &str, count: usize) -> String {
    format!(
        "Create an outline for a presentation about \"{}\".\n\
         Produce exactly {} slide titles in presentation order, starting with an \
         introduction and ending with a conclusion. Keep each title under 8 words.\n\n\
         Respond with a JSON array of strings, for example [\"Title 1\", \"Title 2\"].",
        topic, count
    )
}
