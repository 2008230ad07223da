//! Movie metadata provider abstraction
//!
//! The resolvers only need a few calls from a metadata source: "what is the
//! poster path for this movie, using this credential", the same question by
//! title, and the primary-target details. Keeping them behind traits lets the
//! credential walk be exercised without a network.

pub mod tmdb;
pub mod wikipedia;

pub use tmdb::TmdbClient;
pub use wikipedia::WikipediaClient;

use serde::Serialize;

/// Why a single credential failed to produce a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailure {
    #[error("request timed out")]
    Timeout,

    #[error("credential rejected with status {0}")]
    Unauthorized(u16),

    #[error("movie not found")]
    NotFound,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("response has no poster path")]
    MissingPoster,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl AttemptFailure {
    /// Maps a non-200 status to a failure kind
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => AttemptFailure::Unauthorized(status),
            404 => AttemptFailure::NotFound,
            other => AttemptFailure::Status(other),
        }
    }

    /// The movie exists in the catalog but the lookup produced no poster
    pub fn is_missing_poster(&self) -> bool {
        matches!(self, AttemptFailure::NotFound | AttemptFailure::MissingPoster)
    }
}

/// Strips the URL from reqwest errors; it can carry a credential in its query
pub(crate) fn classify(e: reqwest::Error) -> AttemptFailure {
    if e.is_timeout() {
        AttemptFailure::Timeout
    } else if e.is_decode() {
        AttemptFailure::Decode(e.without_url().to_string())
    } else {
        AttemptFailure::Transport(e.without_url().to_string())
    }
}

/// Detail block shown for the primary target of a recommendation list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieDetails {
    /// Average vote; a zero average counts as unrated
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub overview: String,
    /// YouTube video key of the first trailer
    pub trailer_key: Option<String>,
}

impl MovieDetails {
    pub fn rating_display(&self) -> String {
        self.rating
            .map(|rating| rating.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn release_display(&self) -> &str {
        self.release_date.as_deref().unwrap_or("N/A")
    }

    pub fn runtime_display(&self) -> String {
        format!("{} min", self.runtime_minutes.unwrap_or(0))
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key
            .as_ref()
            .map(|key| format!("https://www.youtube.com/watch?v={}", key))
    }
}

/// Trait for movie metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataApi: Send + Sync {
    /// Fetch the poster path (e.g. `/qJ2tW6WMUDux911r6m7haRef0WH.jpg`) for a movie
    /// using exactly one credential. No retries.
    async fn poster_path(&self, movie_id: i64, api_key: &str) -> Result<String, AttemptFailure>;

    /// Poster path of the best title-search match, for ids the catalog knows
    /// but the details endpoint does not
    async fn search_poster_path(&self, title: &str, api_key: &str) -> Result<String, AttemptFailure>;

    /// Rating, release date, runtime, overview and trailer for a movie
    async fn movie_details(&self, movie_id: i64, api_key: &str) -> Result<MovieDetails, AttemptFailure>;
}

/// Trait for free-text summary sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EncyclopediaApi: Send + Sync {
    /// Summary extract of the page titled exactly `page_title`; `None` when
    /// the page exists but has no extract
    async fn summary(&self, page_title: &str) -> Result<Option<String>, AttemptFailure>;
}
