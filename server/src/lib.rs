use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sitesearch_core::panel::{message_html, MSG_LOADING};
use sitesearch_core::{
    parse_documents, FileSource, IndexSource, LoadError, LoadedIndex, PanelState, PanelView, Renderer, SearchContext,
    SearchResult, WidgetConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The published collection, served as-is at `/api/search.json`.
    pub index_file: PathBuf,
    pub widget: WidgetConfig,
    pub admin_token: Option<String>,
    /// Comma-separated list of allowed origins; any origin when unset.
    pub cors_allow_origin: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub state: PanelState,
    pub message: Option<String>,
    pub html: String,
    pub results: Vec<SearchResult>,
    pub took_s: f64,
}

/// The collection body and the index built from it, swapped as one unit.
struct Snapshot {
    body: String,
    search: SearchContext,
}

impl Snapshot {
    async fn load(path: &Path, widget: &WidgetConfig) -> Result<Self, LoadError> {
        let body = FileSource::new(path).fetch().await?;
        let loaded = LoadedIndex::build(parse_documents(&body)?, widget.index);
        tracing::info!(num_docs = loaded.docs().len(), path = %path.display(), "search data loaded");
        Ok(Self { body, search: SearchContext::with_index(loaded, widget.result_limit) })
    }

    fn num_docs(&self) -> usize {
        self.search.loaded().map_or(0, |l| l.docs().len())
    }
}

#[derive(Clone)]
pub struct AppState {
    index_file: PathBuf,
    widget: WidgetConfig,
    renderer: Renderer,
    snapshot: Arc<RwLock<Snapshot>>,
    admin_token: Option<String>,
}

pub async fn build_app(config: AppConfig) -> Result<Router> {
    config.widget.validate()?;
    let snapshot = Snapshot::load(&config.index_file, &config.widget).await?;
    let app_state = AppState {
        renderer: Renderer::from_config(&config.widget),
        index_file: config.index_file,
        widget: config.widget,
        snapshot: Arc::new(RwLock::new(snapshot)),
        admin_token: config.admin_token,
    };

    let origins: Vec<_> = config
        .cors_allow_origin
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    };

    let index_route = app_state.widget.index_path.clone();
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(&index_route, get(index_handler))
        .route("/search", get(search_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.snapshot.read().body.clone();
    ([(header::CONTENT_TYPE, "application/json")], body)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let view = {
        let snapshot = state.snapshot.read();
        PanelView::resolve(&snapshot.search, &state.renderer, &params.q)
    };
    let response = match view {
        Some(view) => SearchResponse {
            query: params.q,
            state: view.state(),
            message: view.message(),
            html: view.html(),
            results: view.results().to_vec(),
            took_s: start.elapsed().as_secs_f64(),
        },
        None => SearchResponse {
            query: params.q,
            state: PanelState::Loading,
            message: Some(MSG_LOADING.to_string()),
            html: message_html(MSG_LOADING),
            results: Vec::new(),
            took_s: start.elapsed().as_secs_f64(),
        },
    };
    Json(response)
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let snapshot = Snapshot::load(&state.index_file, &state.widget).await.map_err(|e| {
        tracing::warn!(error = %e, "reload failed, keeping previous index");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let num_docs = snapshot.num_docs();
    *state.snapshot.write() = snapshot;
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
