// IPL Season Dashboard - Web Server
// JSON API over the season report, with Axum

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use ipl_dashboard::{
    build_report, filters, init_tracing, DataArgs, DataError, DatasetCache, FilterChoices,
    HeadToHeadScope, Selection,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[clap(name = "ipl-server", about = "IPL season dashboard - JSON API")]
struct ServerCli {
    #[clap(flatten)]
    data: DataArgs,

    /// Address to listen on.
    #[clap(long, env = "IPL_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    cache: Arc<DatasetCache>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Unknown seasons are the caller's fault; anything else is ours
fn error_response(err: DataError) -> Response {
    let status = if err.is_selection_error() {
        warn!(%err, "rejected request");
        StatusCode::NOT_FOUND
    } else {
        error!(%err, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ApiResponse::error(err.to_string()))).into_response()
}

/// Query string for /api/report; unset selectors take their defaults
#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    season: Option<String>,
    batter: Option<String>,
    bowler: Option<String>,
    team_a: Option<String>,
    team_b: Option<String>,
    #[serde(default)]
    h2h_season_only: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ChoicesQuery {
    season: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/seasons - Every season, sorted
async fn get_seasons(State(state): State<AppState>) -> Response {
    match state.cache.get_or_load() {
        Ok(dataset) => Json(ApiResponse::ok(filters::seasons(dataset))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/choices?season= - Valid selector values for a season
async fn get_choices(State(state): State<AppState>, Query(query): Query<ChoicesQuery>) -> Response {
    let result = state.cache.get_or_load().and_then(|dataset| {
        let season = filters::resolve_season(dataset, query.season.as_deref())?;
        FilterChoices::for_season(dataset, &season)
    });

    match result {
        Ok(choices) => Json(ApiResponse::ok(choices)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/report?season=&batter=&bowler=&team_a=&team_b=&h2h_season_only=
async fn get_report(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let result = state.cache.get_or_load().and_then(|dataset| {
        let season = filters::resolve_season(dataset, query.season.as_deref())?;
        let selection = Selection {
            season,
            batter: query.batter,
            bowler: query.bowler,
            team_a: query.team_a,
            team_b: query.team_b,
            head_to_head_scope: if query.h2h_season_only {
                HeadToHeadScope::Season
            } else {
                HeadToHeadScope::AllSeasons
            },
        };
        let (selection, _) = selection.resolve(dataset)?;
        build_report(dataset, &selection)
    });

    match result {
        Ok(report) => Json(ApiResponse::ok(report)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/seasons", get(get_seasons))
        .route("/choices", get(get_choices))
        .route("/report", get(get_report))
        .with_state(state);

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ServerCli::parse();
    init_tracing("info");

    println!("🌐 IPL Season Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load once up front; handlers only ever hit the cache
    let cache = Arc::new(cli.data.cache());
    if let Err(e) = cache.get_or_load() {
        eprintln!("❌ {}", e);
        eprintln!("   Put matches.csv and deliveries.csv in the data directory,");
        eprintln!("   or pass --data-dir / --matches / --deliveries.");
        std::process::exit(1);
    }
    println!(
        "✓ Dataset loaded: {} + {}",
        cache.matches_path().display(),
        cache.deliveries_path().display()
    );

    let app = router(AppState { cache });

    let listener = tokio::net::TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.addr))?;

    info!(addr = %cli.addr, "server listening");
    println!("\n🚀 Server running on http://{}", cli.addr);
    println!("   API: http://{}/api/report", cli.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
