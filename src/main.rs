use std::sync::Arc;

use cinematch::{
    api::{create_router, AppState},
    config::Config,
    dataset::DatasetContext,
    db::{create_redis_client, Cache},
    render::Assets,
    services::{
        providers::{TmdbClient, WikipediaClient},
        Enrichment, PosterResolver, TargetProfiler,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("cinematch={},tower_http=info", config.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    for issue in config.validate() {
        tracing::warn!(issue = %issue, "Configuration issue");
    }

    let dataset = DatasetContext::load(&config.data_dir);
    let assets = Assets::load(&config.assets_dir);

    let tmdb = Arc::new(TmdbClient::new(config.tmdb_api_url.clone(), config.poster_timeout())?);
    let wiki = WikipediaClient::new(
        config.wiki_api_url.clone(),
        &config.wiki_user_agent,
        config.wiki_timeout(),
    )?;
    let profiler = TargetProfiler::new(tmdb.clone(), config.tmdb_api_keys.clone(), Arc::new(wiki));
    let mut posters = PosterResolver::new(
        tmdb,
        config.tmdb_api_keys.clone(),
        config.poster_base_url.clone(),
        config.placeholder_poster_url.clone(),
    );

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?, config.cache_timeout());
        posters = posters.with_cache(cache, config.cache_ttl);
        cache_writer = Some(handle);
        tracing::info!(
            ttl = config.cache_ttl,
            timeout_ms = config.cache_timeout_ms,
            "Poster cache enabled"
        );
    }

    let app = create_router(AppState::new(dataset, Enrichment::new(posters, profiler), assets));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "CineMatch dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}
