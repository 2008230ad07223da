use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    services::providers::{AttemptFailure, MetadataApi},
};

/// Resolves poster URLs with an ordered credential pool
///
/// Each credential gets one id lookup, in pool order. When the id lookup finds
/// no poster and a title is known, the same credential then searches by title.
/// The first poster path wins. When every credential fails the placeholder URL
/// is returned instead; resolution itself never fails.
#[derive(Clone)]
pub struct PosterResolver {
    api: Arc<dyn MetadataApi>,
    credentials: Arc<[String]>,
    poster_base_url: String,
    placeholder_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl PosterResolver {
    pub fn new(
        api: Arc<dyn MetadataApi>,
        credentials: Vec<String>,
        poster_base_url: String,
        placeholder_url: String,
    ) -> Self {
        Self {
            api,
            credentials: credentials.into(),
            poster_base_url,
            placeholder_url,
            cache: None,
            cache_ttl: 0,
        }
    }

    /// Caches resolved URLs for `ttl` seconds. Placeholders are never cached.
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Poster URL for `movie_id`, or the placeholder
    pub async fn resolve_poster(&self, movie_id: i64, title: Option<&str>) -> String {
        let resolved = match &self.cache {
            Some(cache) => {
                let key = CacheKey::Poster(movie_id);
                cached!(cache, key, self.cache_ttl, self.lookup(movie_id, title))
            }
            None => self.lookup(movie_id, title).await,
        };

        match resolved {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(movie_id, error = %e, "Using placeholder poster");
                self.placeholder_url.clone()
            }
        }
    }

    /// Walks the pool and reports every failed credential when none succeeds
    ///
    /// The failures are in pool order, one per credential. A credential that
    /// also searched by title reports the search failure.
    pub async fn try_resolve(
        &self,
        movie_id: i64,
        title: Option<&str>,
    ) -> Result<String, Vec<AttemptFailure>> {
        let mut failures = Vec::with_capacity(self.credentials.len());
        let title = title.map(str::trim).filter(|title| !title.is_empty());

        for (index, api_key) in self.credentials.iter().enumerate() {
            let attempt = match (self.api.poster_path(movie_id, api_key).await, title) {
                (Err(failure), Some(title)) if failure.is_missing_poster() => {
                    tracing::debug!(movie_id, credential = index, failure = %failure, "Searching poster by title");
                    self.api.search_poster_path(title, api_key).await
                }
                (attempt, _) => attempt,
            };

            match attempt {
                Ok(path) => {
                    tracing::debug!(movie_id, credential = index, "Poster resolved");
                    return Ok(format!("{}{}", self.poster_base_url, path));
                }
                Err(failure) => {
                    tracing::debug!(
                        movie_id,
                        credential = index,
                        failure = %failure,
                        "Poster attempt failed"
                    );
                    failures.push(failure);
                }
            }
        }

        Err(failures)
    }

    async fn lookup(&self, movie_id: i64, title: Option<&str>) -> AppResult<String> {
        self.try_resolve(movie_id, title).await.map_err(|failures| {
            if !failures.is_empty() {
                let summary: Vec<String> = failures.iter().map(ToString::to_string).collect();
                tracing::warn!(
                    movie_id,
                    attempts = failures.len(),
                    failures = ?summary,
                    "All poster credentials failed"
                );
            }
            AppError::PosterUnavailable(movie_id)
        })
    }
}
