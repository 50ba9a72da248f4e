use crate::models::{GenerationRequest, OutlineEntry};
use crate::services::llm::{Generation, TextGenerator};

pub const DEFAULT_SLIDE_COUNT: usize = 5;
/// Upper bound on slides per deck; each slide costs one or two upstream calls.
pub const MAX_SLIDE_COUNT: usize = 30;

/// True when the outline is empty or any entry lacks a usable title.
pub fn needs_outline(outline: &[OutlineEntry]) -> bool {
    outline.is_empty() || outline.iter().any(|entry| entry.title().is_none())
}

/// Number of titles to ask for: the supplied outline's length, else the requested
/// slide count, else the default. Never more than [`MAX_SLIDE_COUNT`].
pub fn target_slide_count(outline_len: usize, slide_count: usize) -> usize {
    [outline_len, slide_count]
        .into_iter()
        .find(|&count| count > 0)
        .unwrap_or(DEFAULT_SLIDE_COUNT)
        .min(MAX_SLIDE_COUNT)
}

pub async fn resolve_titles(
    text: &TextGenerator,
    request: &GenerationRequest,
) -> Generation<Vec<String>> {
    if !needs_outline(&request.outline) {
        if request.outline.len() > MAX_SLIDE_COUNT {
            tracing::warn!(
                "Outline has {} entries; keeping the first {}",
                request.outline.len(),
                MAX_SLIDE_COUNT
            );
        }
        let titles = request
            .outline
            .iter()
            .filter_map(OutlineEntry::title)
            .take(MAX_SLIDE_COUNT)
            .map(str::to_string)
            .collect();
        return Generation::Model(titles);
    }

    let count = target_slide_count(request.outline.len(), request.slide_count);
    tracing::info!("Generating outline of {} slides for \"{}\"", count, request.title);
    text.generate_outline(&request.title, count).await
}
