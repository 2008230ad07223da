use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinematch::{
    api::{create_router, AppState},
    dataset::DatasetContext,
    render::Assets,
    services::{
        providers::{AttemptFailure, EncyclopediaApi, MetadataApi, MovieDetails},
        Enrichment, PosterResolver, TargetProfiler,
    },
};

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500/";
const PLACEHOLDER: &str = "https://placehold.co/500x750/0e1117/ffffff.png?text=NO+IMAGE";

/// First credential is always rejected; the second finds posters for even ids,
/// one more by title search, and details for movie 1 only
struct StubMetadata;

#[async_trait::async_trait]
impl MetadataApi for StubMetadata {
    async fn poster_path(&self, movie_id: i64, api_key: &str) -> Result<String, AttemptFailure> {
        match (movie_id, api_key) {
            (_, "revoked") => Err(AttemptFailure::Unauthorized(401)),
            (id, _) if id % 2 == 0 => Ok(format!("/poster-{}.jpg", id)),
            _ => Err(AttemptFailure::NotFound),
        }
    }

    async fn search_poster_path(&self, title: &str, api_key: &str) -> Result<String, AttemptFailure> {
        match (title, api_key) {
            (_, "revoked") => Err(AttemptFailure::Unauthorized(401)),
            ("Dream Candidate 3", _) => Ok("/search-3.jpg".to_string()),
            _ => Err(AttemptFailure::MissingPoster),
        }
    }

    async fn movie_details(&self, movie_id: i64, api_key: &str) -> Result<MovieDetails, AttemptFailure> {
        match (movie_id, api_key) {
            (_, "revoked") => Err(AttemptFailure::Unauthorized(401)),
            (1, _) => Ok(MovieDetails {
                rating: Some(7.9),
                release_date: Some("2010-07-15".to_string()),
                runtime_minutes: Some(148),
                overview: "a tragedy of death inside a dream".to_string(),
                trailer_key: Some("YoHD9XEInc0".to_string()),
            }),
            _ => Err(AttemptFailure::NotFound),
        }
    }
}

/// Only the "(film)" page of the first dream candidate exists
struct StubEncyclopedia;

#[async_trait::async_trait]
impl EncyclopediaApi for StubEncyclopedia {
    async fn summary(&self, page_title: &str) -> Result<Option<String>, AttemptFailure> {
        match page_title {
            "Dream Candidate 1 (film)" => Ok(Some("Dream Candidate 1 is a <heist> film.".to_string())),
            _ => Err(AttemptFailure::NotFound),
        }
    }
}

fn enrichment() -> Enrichment {
    let credentials = vec!["revoked".to_string(), "live".to_string()];
    let posters = PosterResolver::new(
        Arc::new(StubMetadata),
        credentials.clone(),
        POSTER_BASE.to_string(),
        PLACEHOLDER.to_string(),
    );
    let profiler = TargetProfiler::new(Arc::new(StubMetadata), credentials, Arc::new(StubEncyclopedia));
    Enrichment::new(posters, profiler)
}

fn write_dataset(with_evaluation: bool) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cinematch-api-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let movies = json!([
        {"id": 27205, "title": "Inception", "genres": ["Science Fiction"]},
        {"id": 949, "title": "Heat", "genres": ["Crime"]},
        {"id": 11524, "title": "Thief", "genres": ["Crime"]}
    ]);

    let inception: Vec<Value> = (1..=12)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Dream Candidate {}", i),
                "score": 0.95 - i as f64 * 0.01,
                "features": [
                    {"f": "christopher_nolan", "c": 2},
                    {"f": "feature_".to_string() + &i.to_string(), "c": 1},
                    {"f": "dream_logic", "c": 1}
                ]
            })
        })
        .collect();
    let recommendations = json!({
        "Inception": inception,
        "Heat": [
            {"id": 2, "title": "Collateral", "score": 0.612345, "features": [{"f": "michael_mann", "c": 3}]}
        ]
    });

    let manifold = json!([
        {"x": 0.1, "y": 0.2, "z": 0.3, "title": "Inception"},
        {"x": -0.4, "y": 0.5, "z": 0.1, "title": "Heat"}
    ]);

    std::fs::write(dir.join("movies.json"), movies.to_string()).unwrap();
    std::fs::write(dir.join("recommendations.json"), recommendations.to_string()).unwrap();
    std::fs::write(dir.join("manifold.json"), manifold.to_string()).unwrap();
    if with_evaluation {
        let evaluation = json!([
            {"method": "SBERT", "precision": 0.876543, "latency": 4.321},
            {"method": "TFIDF", "precision": 0.7, "latency": 1.0}
        ]);
        std::fs::write(dir.join("evaluation.json"), evaluation.to_string()).unwrap();
    }
    dir
}

fn create_test_server() -> TestServer {
    let dir = write_dataset(true);
    let state = AppState::new(DatasetContext::load(&dir), enrichment(), Assets::default());
    TestServer::new(create_router(state)).unwrap()
}

fn create_unavailable_server() -> TestServer {
    let dir = std::env::temp_dir().join(format!("cinematch-missing-{}", uuid::Uuid::new_v4()));
    let state = AppState::new(DatasetContext::load(&dir), enrichment(), Assets::default());
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 3);
    assert_eq!(body["poster_credentials"], 2);
}

#[tokio::test]
async fn test_health_check_reports_missing_dataset() {
    let server = create_unavailable_server();

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["dataset"], "unavailable");
}

#[tokio::test]
async fn test_dashboard_defaults_to_first_catalog_title() {
    let server = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("LATENT CLUSTER PROJECTIONS FOR: Inception"));
    assert!(html.contains(r#"<section class="tab-panel active" id="tab-recommendations">"#));
    assert_eq!(html.matches(r#"class="rec-card""#).count(), 10);
    assert!(html.contains(&format!("{}/poster-2.jpg", POSTER_BASE)));
    assert!(html.contains(&format!("{}/search-3.jpg", POSTER_BASE)));
    assert!(html.contains(PLACEHOLDER));
    assert!(html.contains(r#"<link rel="stylesheet" href="style.css">"#));
}

#[tokio::test]
async fn test_dashboard_profiles_the_primary_target() {
    let server = create_test_server();

    let html = server.get("/").await.text();

    let lock = html.find("PRIMARY TARGET LOCK").unwrap();
    let grid = html.find("LATENT CLUSTER PROJECTIONS FOR: Inception").unwrap();
    assert!(lock < grid);
    assert!(html.contains("<h1>Dream Candidate 1</h1>"));
    assert!(html.contains(r#"<span class="vibe-label">DARK / GRITTY</span>"#));
    assert!(html.contains(r#"<span class="detail-value">148 min</span>"#));
    assert!(html.contains("https://www.youtube.com/embed/YoHD9XEInc0?rel=0"));
    assert!(html.contains("Dream Candidate 1 is a &lt;heist&gt; film."));
    assert!(html.contains(r#"<a class="rec-btn" href="?title=Dream%20Candidate%202">ANALYZE &rarr;</a>"#));
}

#[tokio::test]
async fn test_dashboard_title_lookup_is_case_insensitive() {
    let server = create_test_server();

    let html = server
        .get("/")
        .add_query_param("title", "heat")
        .add_query_param("view", "analytics")
        .await
        .text();

    assert!(html.contains("SIMILARITY ANALYTICS FOR: Heat"));
    assert!(html.contains(r#"<section class="tab-panel active" id="tab-analytics">"#));
}

#[tokio::test]
async fn test_every_title_without_recommendations_renders_empty_state() {
    let server = create_test_server();

    let response = server.get("/").add_query_param("title", "Thief").await;

    response.assert_status_ok();
    assert!(response
        .text()
        .contains(r#"No recommendations found for "Thief"."#));
}

#[tokio::test]
async fn test_dashboard_without_dataset_shows_error_page() {
    let server = create_unavailable_server();

    let response = server.get("/").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let html = response.text();
    assert!(html.contains("DATA ARTIFACTS NOT FOUND"));
    assert!(!html.contains("tab-panel"));
}

#[tokio::test]
async fn test_embed_inlines_assets_and_selects_tab() {
    let server = create_test_server();

    let response = server.get("/embed").add_query_param("tab", "manifold").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<style>"));
    assert!(!html.contains(r#"<script src="app.js"></script>"#));
    assert!(html.contains("window.__CINEMATCH_DATA__ = {"));
    assert!(html.contains(r#"window.__CINEMATCH_INITIAL_VIEW__ = "manifold";"#));
    assert!(html.contains(r#"<section class="tab-panel active" id="tab-manifold">"#));
    assert!(html.contains(r#"name="tab" value="manifold""#));
}

#[tokio::test]
async fn test_embed_ignores_unknown_tab() {
    let server = create_test_server();

    let html = server.get("/embed").add_query_param("tab", "bogus").await.text();

    assert!(html.contains("window.__CINEMATCH_INITIAL_VIEW__ = null;"));
    assert!(html.contains(r#"<section class="tab-panel active" id="tab-recommendations">"#));
}

#[tokio::test]
async fn test_embed_without_dataset_is_self_contained() {
    let server = create_unavailable_server();

    let response = server.get("/embed").add_query_param("tab", "manifold").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let html = response.text();
    assert!(html.contains("DATA ARTIFACTS NOT FOUND"));
    assert!(html.contains("<style>"));
    assert!(!html.contains(r#"href="style.css""#));
    assert!(!html.contains(r#"src="app.js""#));
}

#[tokio::test]
async fn test_pipeline_page_opens_on_pipeline_view() {
    let server = create_test_server();

    let response = server.get("/pipeline").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"window.__CINEMATCH_INITIAL_VIEW__ = "pipeline";"#));
    assert!(html.contains(r#"<section class="tab-panel active" id="tab-pipeline">"#));
    assert!(html.contains("PIPELINE ARCHITECTURE"));
    assert!(html.contains(r#"<tr><td>movies.json</td><td>movies</td><td class="metric">3</td></tr>"#));
    assert!(html.contains("<style>"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let server = create_test_server();

    let css = server.get("/style.css").await;
    css.assert_status_ok();
    assert_eq!(css.header("content-type"), "text/css; charset=utf-8");

    let js = server.get("/app.js").await;
    js.assert_status_ok();
    assert!(js.text().contains("function loadAllData"));
}

#[tokio::test]
async fn test_search_movies() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/search").add_query_param("q", "T").await;

    response.assert_status_ok();
    let titles: Vec<String> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Thief", "Inception", "Heat"]);
}

#[tokio::test]
async fn test_recommendations_api() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Inception")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 10);
    assert_eq!(cards[0]["title"], "Dream Candidate 1");
    assert_eq!(cards[0]["score_display"], "0.9400");
    assert_eq!(cards[0]["poster_url"], PLACEHOLDER);
    assert_eq!(cards[1]["poster_url"], format!("{}/poster-2.jpg", POSTER_BASE));
    assert_eq!(cards[0]["features"][0]["label"], "Christopher Nolan");
    assert_eq!(cards[2]["poster_url"], format!("{}/search-3.jpg", POSTER_BASE));

    let primary = &body["primary"];
    assert_eq!(primary["title"], "Dream Candidate 1");
    assert_eq!(primary["features"].as_array().unwrap().len(), 3);
    assert_eq!(primary["profile"]["vibe"], "DARK / GRITTY");
    assert_eq!(primary["profile"]["details"]["trailer_key"], "YoHD9XEInc0");
}

#[tokio::test]
async fn test_title_query_parameter_is_required() {
    let server = create_test_server();

    for path in ["/api/v1/recommendations", "/api/v1/analytics"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Missing required query parameter: title", "{path}");

        let blank = server.get(path).add_query_param("title", "  ").await;
        blank.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_recommendations_api_missing_title() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Thief")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "No recommendations found for \"Thief\"");
}

#[tokio::test]
async fn test_analytics_api() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/v1/analytics")
        .add_query_param("title", "Inception")
        .await
        .json();

    assert_eq!(body["scores"].as_array().unwrap().len(), 10);
    let features = body["features"].as_array().unwrap();
    // two shared features plus feature_1..feature_10
    assert_eq!(features.len(), 12);
    let last = features.last().unwrap();
    assert_eq!(last["feature"], "christopher_nolan");
    assert_eq!(last["total"], 20.0);
}

#[tokio::test]
async fn test_evaluation_api() {
    let server = create_test_server();

    let body: Vec<Value> = server.get("/api/v1/evaluation").await.json();

    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["key"], "sbert");
    assert_eq!(body[0]["precision"], "0.8765");
    assert_eq!(body[0]["latency"], "4.32ms");
}

#[tokio::test]
async fn test_evaluation_api_without_file_is_empty() {
    let dir = write_dataset(false);
    let state = AppState::new(DatasetContext::load(&dir), enrichment(), Assets::default());
    let server = TestServer::new(create_router(state)).unwrap();

    let body: Vec<Value> = server.get("/api/v1/evaluation").await.json();

    assert!(body.is_empty());
}

#[tokio::test]
async fn test_poster_api_falls_back_to_placeholder() {
    let server = create_test_server();

    let found: Value = server.get("/api/v1/posters/4").await.json();
    assert_eq!(found["url"], format!("{}/poster-4.jpg", POSTER_BASE));

    let missing: Value = server.get("/api/v1/posters/5").await.json();
    assert_eq!(missing["movie_id"], 5);
    assert_eq!(missing["url"], PLACEHOLDER);

    let searched: Value = server
        .get("/api/v1/posters/5")
        .add_query_param("title", "Dream Candidate 3")
        .await
        .json();
    assert_eq!(searched["url"], format!("{}/search-3.jpg", POSTER_BASE));
}

#[tokio::test]
async fn test_poster_api_rejects_non_numeric_id() {
    let server = create_test_server();

    let response = server.get("/api/v1/posters/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid movie id: abc");
}

#[tokio::test]
async fn test_view_fragment() {
    let server = create_test_server();

    let response = server.get("/api/v1/views/evaluation").await;
    response.assert_status_ok();
    assert!(response.text().contains(r#"id="sbert-precision">0.8765</td>"#));

    let pipeline = server.get("/api/v1/views/pipeline").await;
    pipeline.assert_status_ok();
    assert!(pipeline.text().contains("PIPELINE ARCHITECTURE"));

    let bad = server.get("/api/v1/views/bogus").await;
    bad.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad.json();
    assert_eq!(body["error"], "Unknown view: bogus");
}

#[tokio::test]
async fn test_api_without_dataset_is_unavailable() {
    let server = create_unavailable_server();

    let response = server.get("/api/v1/movies").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Data artifacts not found");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("host-trace-7"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "host-trace-7");
}
