use std::sync::Arc;

use serde::Serialize;

use crate::{
    format::truncate_chars,
    services::{
        providers::{EncyclopediaApi, MetadataApi, MovieDetails},
        vibe::{analyze_vibe, Vibe},
    },
};

/// Summary extracts are cut to this many characters
pub const WIKI_SUMMARY_CHARS: usize = 800;

pub const NO_SUMMARY: &str = "No Wikipedia entry found.";

/// Details, encyclopedia summary and mood for the primary target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProfile {
    /// `None` when no credential produced details
    pub details: Option<MovieDetails>,
    pub summary: String,
    pub vibe: Vibe,
}

/// Gathers the extra context shown above the recommendation grid
///
/// Nothing here fails: missing details are omitted, a missing summary becomes
/// [`NO_SUMMARY`].
#[derive(Clone)]
pub struct TargetProfiler {
    api: Arc<dyn MetadataApi>,
    credentials: Arc<[String]>,
    wiki: Arc<dyn EncyclopediaApi>,
}

impl TargetProfiler {
    pub fn new(
        api: Arc<dyn MetadataApi>,
        credentials: Vec<String>,
        wiki: Arc<dyn EncyclopediaApi>,
    ) -> Self {
        Self {
            api,
            credentials: credentials.into(),
            wiki,
        }
    }

    /// Details from the first credential that succeeds
    pub async fn details(&self, movie_id: i64) -> Option<MovieDetails> {
        for (index, api_key) in self.credentials.iter().enumerate() {
            match self.api.movie_details(movie_id, api_key).await {
                Ok(details) => return Some(details),
                Err(failure) => {
                    tracing::debug!(
                        movie_id,
                        credential = index,
                        failure = %failure,
                        "Details attempt failed"
                    );
                }
            }
        }

        tracing::warn!(movie_id, "No movie details available");
        None
    }

    /// Summary for the bare title, then for `"{title} (film)"`
    pub async fn summary(&self, title: &str) -> String {
        for page in [title.to_string(), format!("{} (film)", title)] {
            match self.wiki.summary(&page).await {
                Ok(Some(extract)) => return truncate_chars(&extract, WIKI_SUMMARY_CHARS),
                Ok(None) => {}
                Err(failure) => tracing::debug!(page = %page, failure = %failure, "Summary lookup failed"),
            }
        }

        NO_SUMMARY.to_string()
    }

    /// Details and summary are fetched concurrently; the vibe reads both texts
    pub async fn profile(&self, movie_id: i64, title: &str) -> TargetProfile {
        let (details, summary) = tokio::join!(self.details(movie_id), self.summary(title));

        let overview = details.as_ref().map(|d| d.overview.as_str()).unwrap_or_default();
        let vibe = analyze_vibe(&format!("{} {}", summary, overview));

        TargetProfile {
            details,
            summary,
            vibe,
        }
    }
}
