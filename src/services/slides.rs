use crate::error::PipelineError;
use crate::models::{
    AmountOfText, DeckMeta, DeckResponse, GenerationRequest, ImageSource, Layout, SlideImage,
    SlideRecord,
};
use crate::services::image::compose_image_prompt;
use crate::services::outline;
use crate::state::AppState;
use rand::Rng;

/// The opening slide always puts its image on the left; the rest pick at random.
pub fn pick_layout(index: usize) -> Layout {
    if index == 0 {
        return Layout::ImageLeft;
    }
    let mut rng = rand::rng();
    Layout::ALL[rng.random_range(0..Layout::ALL.len())]
}

/// Per-slide inputs, owned so each slide can run as its own task.
#[derive(Debug, Clone)]
struct SlideJob {
    index: usize,
    title: String,
    topic: String,
    theme: String,
    amount: AmountOfText,
    image_source: ImageSource,
    image_style: String,
}

async fn build_slide(state: AppState, job: SlideJob) -> SlideRecord {
    let content = state
        .text
        .generate_slide_content(job.index, &job.title, &job.topic, job.amount)
        .await;

    let image = match job.image_source {
        ImageSource::None => None,
        source => {
            let prompt = compose_image_prompt(&job.title, &job.topic, &job.image_style);
            state
                .images
                .generate(&prompt, &job.image_style, job.index)
                .await
                .map(|url| SlideImage {
                    url,
                    alt: job.title.clone(),
                    source,
                    style: job.image_style.clone(),
                })
        }
    };

    tracing::debug!(
        "Slide {} assembled with {} entries (fallback text: {}, image: {})",
        job.index + 1,
        content.value().len(),
        content.is_fallback(),
        image.is_some()
    );

    SlideRecord {
        id: (job.index + 1).to_string(),
        title: job.title,
        bullets: content.into_inner(),
        layout: pick_layout(job.index),
        theme: job.theme,
        image,
    }
}

/// Builds every slide concurrently; the result keeps the order of `titles`.
pub async fn assemble_slides(
    state: &AppState,
    titles: Vec<String>,
    request: &GenerationRequest,
) -> Result<Vec<SlideRecord>, PipelineError> {
    let handles: Vec<_> = titles
        .into_iter()
        .enumerate()
        .map(|(index, title)| {
            let job = SlideJob {
                index,
                title,
                topic: request.title.clone(),
                theme: request.theme.clone(),
                amount: request.amount_of_text,
                image_source: request.image_source,
                image_style: request.image_style.clone(),
            };
            tokio::spawn(build_slide(state.clone(), job))
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(PipelineError::from))
        .collect()
}

pub async fn generate_deck(
    state: &AppState,
    request: &GenerationRequest,
) -> Result<DeckResponse, PipelineError> {
    let titles = outline::resolve_titles(&state.text, request).await;
    if let Some(reason) = titles.fallback_reason() {
        tracing::info!("Using fallback outline for \"{}\": {}", request.title, reason);
    }
    let titles = titles.into_inner();

    let slides = assemble_slides(state, titles, request).await?;
    tracing::info!("Generated {} slides for \"{}\"", slides.len(), request.title);

    Ok(DeckResponse {
        slides,
        meta: DeckMeta::from(request),
    })
}
