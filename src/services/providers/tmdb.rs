//! TMDB metadata provider
//!
//! Three endpoints are used, each authenticated with an `api_key` query
//! parameter: movie details (`/movie/{id}`, optionally with
//! `append_to_response=videos`) and title search (`/search/movie`).

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::providers::{classify, AttemptFailure, MetadataApi, MovieDetails};

#[derive(Debug, Deserialize)]
struct PosterOnly {
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    results: Vec<PosterOnly>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    videos: Option<VideoList>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<DetailsResponse> for MovieDetails {
    fn from(response: DetailsResponse) -> Self {
        let trailer_key = response
            .videos
            .into_iter()
            .flat_map(|videos| videos.results)
            .find(|video| video.kind == "Trailer" && video.site == "YouTube")
            .map(|video| video.key);

        Self {
            rating: response.vote_average.filter(|rating| *rating != 0.0),
            release_date: response.release_date.filter(|date| !date.is_empty()),
            runtime_minutes: response.runtime,
            overview: response.overview.unwrap_or_default(),
            trailer_key,
        }
    }
}

fn non_empty_path(path: Option<String>) -> Result<String, AttemptFailure> {
    path.filter(|path| !path.trim().is_empty())
        .ok_or(AttemptFailure::MissingPoster)
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_url: String,
}

impl TmdbClient {
    /// `timeout` bounds each request end to end
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// One authenticated GET; any status other than 200 is a failure
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AttemptFailure> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptFailure::from_status(status.as_u16()));
        }

        response.json().await.map_err(classify)
    }
}

#[async_trait::async_trait]
impl MetadataApi for TmdbClient {
    async fn poster_path(&self, movie_id: i64, api_key: &str) -> Result<String, AttemptFailure> {
        let details: PosterOnly = self
            .get_json(&format!("/movie/{}", movie_id), &[("api_key", api_key)])
            .await?;

        non_empty_path(details.poster_path)
    }

    async fn search_poster_path(&self, title: &str, api_key: &str) -> Result<String, AttemptFailure> {
        let search: SearchResults = self
            .get_json("/search/movie", &[("api_key", api_key), ("query", title)])
            .await?;

        non_empty_path(search.results.into_iter().next().and_then(|hit| hit.poster_path))
    }

    async fn movie_details(&self, movie_id: i64, api_key: &str) -> Result<MovieDetails, AttemptFailure> {
        let details: DetailsResponse = self
            .get_json(
                &format!("/movie/{}", movie_id),
                &[("api_key", api_key), ("append_to_response", "videos")],
            )
            .await?;

        Ok(details.into())
    }
}
