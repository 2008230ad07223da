use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding movies.json, recommendations.json, manifold.json and evaluation.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding index.html, style.css and app.js overrides
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metadata API credentials, tried in order (comma-separated in the environment)
    #[serde(default)]
    pub tmdb_api_keys: Vec<String>,

    /// Metadata API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Image CDN prefix prepended to a poster path
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Returned when no credential yields a poster
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Per-attempt timeout for poster lookups
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Encyclopedia REST base URL for primary-target summaries
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,

    /// User-Agent sent to the encyclopedia API
    #[serde(default = "default_wiki_user_agent")]
    pub wiki_user_agent: String,

    /// Per-request timeout for summary lookups
    #[serde(default = "default_wiki_timeout_secs")]
    pub wiki_timeout_secs: u64,

    /// Redis connection URL; poster caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Poster cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,

    /// Upper bound on one Redis round trip; a slower read counts as a miss
    #[serde(default = "default_cache_timeout_ms")]
    pub cache_timeout_ms: u64,

    /// Fallback log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500/".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://placehold.co/500x750/0e1117/ffffff.png?text=NO+IMAGE".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    5
}

fn default_wiki_api_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}

fn default_wiki_user_agent() -> String {
    "CineMatch/2.0 (Educational Research Project)".to_string()
}

fn default_wiki_timeout_secs() -> u64 {
    4
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_timeout_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            assets_dir: default_assets_dir(),
            host: default_host(),
            port: default_port(),
            tmdb_api_keys: Vec::new(),
            tmdb_api_url: default_tmdb_api_url(),
            poster_base_url: default_poster_base_url(),
            placeholder_poster_url: default_placeholder_poster_url(),
            poster_timeout_secs: default_poster_timeout_secs(),
            wiki_api_url: default_wiki_api_url(),
            wiki_user_agent: default_wiki_user_agent(),
            wiki_timeout_secs: default_wiki_timeout_secs(),
            redis_url: None,
            cache_ttl: default_cache_ttl(),
            cache_timeout_ms: default_cache_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map(Config::normalized)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Drops blank credentials left behind by trailing commas
    fn normalized(mut self) -> Self {
        self.tmdb_api_keys = self
            .tmdb_api_keys
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        self
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_secs(self.poster_timeout_secs)
    }

    pub fn wiki_timeout(&self) -> Duration {
        Duration::from_secs(self.wiki_timeout_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Human-readable configuration problems worth a startup warning
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.tmdb_api_keys.is_empty() {
            issues.push("TMDB_API_KEYS not set; every poster will use the placeholder".to_string());
        }

        if self.poster_timeout_secs == 0 {
            issues.push("POSTER_TIMEOUT_SECS is 0; poster lookups will time out immediately".to_string());
        }

        if self.cache_ttl == 0 && self.redis_url.is_some() {
            issues.push("CACHE_TTL is 0; cached posters expire immediately".to_string());
        }

        if self.cache_timeout_ms == 0 && self.redis_url.is_some() {
            issues.push("CACHE_TIMEOUT_MS is 0; every cache read will be a miss".to_string());
        }

        issues
    }
}
