use crate::error::PipelineError;
use crate::models::{DeckResponse, GenerationRequest, ImageRequest, ImageResponse};
use crate::services::image::{self, UPLOADS_ROUTE};
use crate::services::slides;
use crate::state::AppState;
use axum::{
    Router,
    extract::State,
    response::{Html, Json},
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.images.uploads_dir());

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/generate", post(generate))
        .route("/api/generate-image", post(generate_image))
        .nest_service(UPLOADS_ROUTE, uploads)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(AllowMethods::any())
                .allow_headers(AllowHeaders::any()),
        )
}

async fn index() -> Html<&'static str> {
    Html(
        r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Presentation Generator API</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>Presentation Generator API</h1>
        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">POST /api/generate - Generate a slide deck from a topic</div>
        <div class="endpoint">POST /api/generate-image - Generate a single slide image</div>
        <div class="endpoint">GET /uploads/&lt;file&gt; - Download a generated image</div>
    </body>
    </html>
    "#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<DeckResponse>, PipelineError> {
    let span = tracing::info_span!("generate", request_id = %uuid::Uuid::new_v4());
    async move {
        tracing::info!(
            "Generating presentation \"{}\" ({:?}, images: {:?})",
            request.title,
            request.amount_of_text,
            request.image_source
        );
        let deck = slides::generate_deck(&state, &request).await?;
        Ok::<_, PipelineError>(Json(deck))
    }
    .instrument(span)
    .await
}

async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Json<ImageResponse> {
    let prompt = image::styled_prompt(&request.prompt, &request.style);
    let image_url = state
        .images
        .generate(&prompt, &request.style, request.slide_index)
        .await;
    Json(ImageResponse { image_url })
}
