use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::EvaluationDisplay,
    render::{self, page, EmbedRenderer},
    services::{
        analytics::{self, AnalyticsView},
        recommendations::{self, RecommendationView},
        search::{search_titles, SEARCH_LIMIT},
        Selection, View,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub title: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedQuery {
    pub title: Option<String>,
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

impl TitleQuery {
    /// The trimmed title; a missing or blank one is a client error
    fn required(&self) -> AppResult<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing required query parameter: title".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub movie_id: i64,
    pub url: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    match state.dataset() {
        Ok(context) => Json(json!({
            "status": "healthy",
            "dataset": "ready",
            "movies": context.movies().len(),
            "recommendation_keys": context.recommendation_count(),
            "manifold_points": context.manifold().len(),
            "loaded_at": context.loaded_at(),
            "poster_credentials": state.enrichment.posters.credential_count(),
        })),
        Err(_) => Json(json!({
            "status": "degraded",
            "dataset": "unavailable",
        })),
    }
}

/// Standalone dashboard page
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let Ok(context) = state.dataset() else {
        return unavailable_page(&state);
    };

    let started = Instant::now();
    let selection = Selection::from_request(context, query.title.as_deref());
    let view = View::from_tag_or_default(query.view.as_deref());

    let content = page::render_content(context, &selection, view, &state.enrichment, "view").await;

    tracing::info!(
        request_id = %request_id,
        title = ?selection.title(),
        view = %view,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dashboard rendered"
    );

    Html(page::standalone(&state.assets, &content)).into_response()
}

/// Dashboard fragment with inlined assets and injected data
pub async fn embed(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<EmbedQuery>,
) -> Response {
    let initial_view = query.tab.as_deref().and_then(|tag| match tag.parse::<View>() {
        Ok(view) => Some(view),
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Ignoring unknown initial tab");
            None
        }
    });

    render_embed(&state, &request_id, initial_view, query.title.as_deref()).await
}

/// The embedded dashboard opened on the pipeline view
pub async fn pipeline_page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ViewQuery>,
) -> Response {
    render_embed(&state, &request_id, Some(View::Pipeline), query.title.as_deref()).await
}

async fn render_embed(
    state: &AppState,
    request_id: &RequestId,
    initial_view: Option<View>,
    title: Option<&str>,
) -> Response {
    let renderer = EmbedRenderer::new(&state.assets, initial_view);

    let Ok(context) = state.dataset() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(renderer.render_unavailable()),
        )
            .into_response();
    };

    let selection = Selection::from_request(context, title);
    let content = page::render_content(
        context,
        &selection,
        renderer.active_view(),
        &state.enrichment,
        "tab",
    )
    .await;

    match renderer.render(context, &content) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Data injection failed; serving fragment without it");
            Html(page::standalone(&state.assets, &content)).into_response()
        }
    }
}

/// One rendered view as an HTML fragment
pub async fn view_fragment(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
) -> AppResult<Html<String>> {
    let context = state.dataset()?;
    let view: View = view.parse()?;
    let selection = Selection::from_request(context, query.title.as_deref());

    Ok(Html(
        render::render_view(context, &selection, view, &state.enrichment).await,
    ))
}

pub async fn style_css(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.assets.style_css.clone(),
    )
}

pub async fn app_js(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        state.assets.app_js.clone(),
    )
}

/// Full movie catalog
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Response> {
    let context = state.dataset()?;
    Ok(Json(context.movies()).into_response())
}

/// Title autocomplete
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let context = state.dataset()?;
    let matches = search_titles(context.movies(), &query.q, SEARCH_LIMIT);

    tracing::debug!(query = %query.q, results = matches.len(), "Title search completed");

    Ok(Json(matches).into_response())
}

/// Top recommendations for a title, posters resolved
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<RecommendationView>> {
    let context = state.dataset()?;
    let title = query.required()?;
    let view = recommendations::build_view(context, title, &state.enrichment).await;

    if view.is_empty() {
        return Err(no_recommendations(title));
    }
    Ok(Json(view))
}

/// Score and feature-frequency series for a title
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<AnalyticsView>> {
    let context = state.dataset()?;
    let title = query.required()?;
    let view = analytics::build_view(context, title);

    if view.is_empty() {
        return Err(no_recommendations(title));
    }
    Ok(Json(view))
}

pub async fn get_manifold(State(state): State<AppState>) -> AppResult<Response> {
    let context = state.dataset()?;
    Ok(Json(context.manifold()).into_response())
}

/// Evaluation metrics with display strings; empty when no evaluation was exported
pub async fn get_evaluation(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EvaluationDisplay>>> {
    let context = state.dataset()?;
    Ok(Json(
        context.evaluation().iter().map(|m| m.display()).collect(),
    ))
}

/// Poster URL for a movie id; the placeholder when no credential resolves it
///
/// An optional `title` enables the title-search fallback.
pub async fn get_poster(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<PosterQuery>,
) -> AppResult<Json<PosterResponse>> {
    let movie_id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {}", raw_id)))?;

    let url = state
        .enrichment
        .posters
        .resolve_poster(movie_id, query.title.as_deref())
        .await;
    Ok(Json(PosterResponse { movie_id, url }))
}

fn no_recommendations(title: &str) -> AppError {
    AppError::NotFound(format!("No recommendations found for \"{}\"", title))
}

fn unavailable_page(state: &AppState) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(page::unavailable(&state.assets)),
    )
        .into_response()
}
