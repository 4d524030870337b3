use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use qtoday::{DateKey, SourcedDevotional, WebScraper};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

/// Edge caches may serve a devotional for 30 minutes, then stale for a day while refreshing.
pub const CACHE_CONTROL_FRESH: &str = "s-maxage=1800, stale-while-revalidate=86400";
const CACHE_CONTROL_ERROR: &str = "no-store";

#[derive(Debug, Default, Deserialize)]
pub struct TodayParams {
    #[serde(rename = "qtDate")]
    pub qt_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    #[serde(flatten)]
    pub devotional: SourcedDevotional,
    pub took_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub took_ms: u64,
}

pub fn router(scraper: WebScraper) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/today.json", get(today))
        .route("/api/qt/today.json", get(today))
        .route("/health", get(health))
        .layer(cors)
        .with_state(scraper)
}

async fn health() -> &'static str {
    "ok"
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn error_response(error: String, started: Instant) -> Response {
    let body = ErrorResponse {
        error,
        took_ms: elapsed_ms(started),
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CACHE_CONTROL, CACHE_CONTROL_ERROR)],
        Json(body),
    )
        .into_response()
}

/// `GET /today.json?qtDate=YYYY-MM-DD`
///
/// A `qtDate` that is not a calendar date skips the dated pages and serves the live one.
pub async fn today(
    State(scraper): State<WebScraper>,
    params: Result<Query<TodayParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();

    let raw_date = match params {
        Ok(Query(p)) => p.qt_date,
        Err(e) => {
            log::warn!("Ignoring unreadable query string: {}", e.body_text());
            None
        }
    };
    let date = DateKey::from_optional(raw_date.as_deref())
        .inspect_err(|e| log::warn!("{e}, falling back to the live page"))
        .ok();

    match scraper.fetch_devotional(date.as_ref()).await {
        Ok(devotional) => {
            let body = TodayResponse {
                devotional,
                took_ms: elapsed_ms(started),
            };
            log::info!(
                "Served devotional from {} in {}ms",
                body.devotional.source_url,
                body.took_ms
            );
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, CACHE_CONTROL_FRESH)],
                Json(body),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("Failed to serve devotional: {}", e);
            error_response(e.to_string(), started)
        }
    }
}
