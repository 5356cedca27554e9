use std::time::Duration;

use anyhow::{Context, Result, bail};
use axum::{Json, Router, routing::post};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use rand::Rng;
use tower_http::limit::RequestBodyLimitLayer;

use snapbite_core::analysis::{AnalysisResponse, AnalyzeRequest, macro_percentages};
use snapbite_core::lookup;
use snapbite_core::models::{SOURCE_AI, SOURCE_LOCAL};
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

const BODY_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

// --- Handlers ---

/// `POST /analyze` — the stub recognizer. Decodes the payload, picks a
/// random food from the nutrition table, and resolves it through the
/// lookup. Both outcomes answer HTTP 200; failures carry an
/// `error`/`details` payload instead of an estimate, matching what
/// clients of the hosted endpoint already expect.
async fn analyze(Json(request): Json<AnalyzeRequest>) -> Json<AnalysisResponse> {
    Json(analyze_payload(&request))
}

fn analyze_payload(request: &AnalyzeRequest) -> AnalysisResponse {
    match recognize(&request.image) {
        Ok(response) => response,
        Err(err) => AnalysisResponse {
            error: Some(format!("Failed to analyze image: {err}")),
            details: Some(format!("{err:#}")),
            ..AnalysisResponse::default()
        },
    }
}

fn recognize(image: &str) -> Result<AnalysisResponse> {
    decode_image(image)?;

    // There is no real recognition: any readable image maps to a random
    // table entry.
    let index = rand::rng().random_range(0..lookup::NUTRITION_TABLE.len());
    let (prediction, ..) = lookup::NUTRITION_TABLE[index];

    match lookup::find(prediction) {
        Some(m) => Ok(AnalysisResponse {
            description: Some(prediction.to_string()),
            calories: Some(m.calories),
            protein: Some(m.protein),
            carbs: Some(m.carbs),
            fat: Some(m.fat),
            confidence: Some(m.confidence),
            source: Some(SOURCE_LOCAL.to_string()),
            macro_percentages: Some(macro_percentages(m.protein, m.carbs, m.fat)),
            error: None,
            details: None,
        }),
        None => {
            let d = lookup::DEFAULT_ESTIMATE;
            Ok(AnalysisResponse {
                description: Some(prediction.to_string()),
                calories: Some(d.calories),
                protein: Some(d.protein),
                carbs: Some(d.carbs),
                fat: Some(d.fat),
                confidence: Some(0.9),
                source: Some(SOURCE_AI.to_string()),
                macro_percentages: Some(macro_percentages(d.protein, d.carbs, d.fat)),
                error: None,
                details: None,
            })
        }
    }
}

/// Accepts a bare base64 string or a `data:image/...;base64,` URL.
fn decode_image(image: &str) -> Result<Vec<u8>> {
    if image.is_empty() {
        bail!("No image provided");
    }
    let data = image.split_once(";base64,").map_or(image, |(_, rest)| rest);
    STANDARD.decode(data).context("Invalid image format")
}

// --- Server ---

pub fn build_router() -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
}

pub async fn start_server(tracker: Tracker<SqliteStore>, port: u16, bind: &str) -> Result<()> {
    tokio::spawn(midnight_pruner(tracker));

    let app = build_router();
    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    eprintln!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Poll the clock once a minute and trim the ledger when the local date
/// changes. Rollover lands within one polling interval after midnight,
/// not at it.
async fn midnight_pruner(tracker: Tracker<SqliteStore>) {
    let mut last = Local::now().date_naive();
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    interval.tick().await; // consume the immediate first tick

    loop {
        interval.tick().await;
        let today = Local::now().date_naive();
        if today != last {
            match tracker.prune_to_today(today) {
                Ok(removed) if removed > 0 => {
                    eprintln!("Day rollover: trimmed {removed} entries from previous days");
                }
                Ok(_) => {}
                Err(err) => eprintln!("Day rollover failed: {err:#}"),
            }
            last = today;
        }
    }
}
