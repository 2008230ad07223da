//! Read-only recommendation dataset shared by every renderer.
//!
//! The upstream pipeline exports four JSON documents. Three of them are
//! required; `evaluation.json` is optional and degrades to an empty list.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{Candidate, EvaluationMetric, ManifoldPoint, Movie};

pub const MOVIES_FILE: &str = "movies.json";
pub const RECOMMENDATIONS_FILE: &str = "recommendations.json";
pub const MANIFOLD_FILE: &str = "manifold.json";
pub const EVALUATION_FILE: &str = "evaluation.json";

/// Immutable view of the exported dataset, built once at startup
#[derive(Debug, Clone)]
pub struct DatasetContext {
    movies: Vec<Movie>,
    recommendations: HashMap<String, Vec<Candidate>>,
    manifold: Vec<ManifoldPoint>,
    evaluation: Vec<EvaluationMetric>,
    /// Lower-cased title -> recommendation key
    folded_titles: HashMap<String, String>,
    loaded_at: DateTime<Utc>,
}

/// The four documents as they are injected into an embedded page
#[derive(Debug, Serialize)]
pub struct InjectedData<'a> {
    pub movies: &'a [Movie],
    pub recommendations: &'a HashMap<String, Vec<Candidate>>,
    pub manifold: &'a [ManifoldPoint],
    pub evaluation: &'a [EvaluationMetric],
}

impl DatasetContext {
    /// Loads all documents from `base_dir`
    ///
    /// Fails on the first required document that is missing or does not parse.
    pub fn load(base_dir: &Path) -> AppResult<Self> {
        let movies: Vec<Movie> = read_required(&base_dir.join(MOVIES_FILE))?;
        let recommendations: HashMap<String, Vec<Candidate>> =
            read_required(&base_dir.join(RECOMMENDATIONS_FILE))?;
        let manifold: Vec<ManifoldPoint> = read_required(&base_dir.join(MANIFOLD_FILE))?;
        let evaluation = read_optional(&base_dir.join(EVALUATION_FILE));

        let context = Self::from_parts(movies, recommendations, manifold, evaluation);

        tracing::info!(
            data_dir = %base_dir.display(),
            movies = context.movies.len(),
            recommendation_keys = context.recommendations.len(),
            manifold_points = context.manifold.len(),
            evaluation_methods = context.evaluation.len(),
            "Dataset loaded"
        );

        Ok(context)
    }

    pub fn from_parts(
        movies: Vec<Movie>,
        recommendations: HashMap<String, Vec<Candidate>>,
        manifold: Vec<ManifoldPoint>,
        evaluation: Vec<EvaluationMetric>,
    ) -> Self {
        let folded_titles = fold_titles(&recommendations);

        Self {
            movies,
            recommendations,
            manifold,
            evaluation,
            folded_titles,
            loaded_at: Utc::now(),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn manifold(&self) -> &[ManifoldPoint] {
        &self.manifold
    }

    pub fn evaluation(&self) -> &[EvaluationMetric] {
        &self.evaluation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn recommendation_count(&self) -> usize {
        self.recommendations.len()
    }

    /// Title selected when the user has not picked one
    pub fn first_title(&self) -> Option<&str> {
        self.movies.first().map(|movie| movie.title.as_str())
    }

    /// Looks up the recommendation list for `title`
    ///
    /// An exact key match wins; otherwise titles are compared case-insensitively.
    /// Returns the matched key alongside the candidates.
    pub fn recommendations_for(&self, title: &str) -> Option<(&str, &[Candidate])> {
        if let Some((key, candidates)) = self.recommendations.get_key_value(title) {
            return Some((key.as_str(), candidates.as_slice()));
        }

        let key = self.folded_titles.get(&title.trim().to_lowercase())?;
        self.recommendations
            .get_key_value(key)
            .map(|(key, candidates)| (key.as_str(), candidates.as_slice()))
    }

    pub fn injected(&self) -> InjectedData<'_> {
        InjectedData {
            movies: &self.movies,
            recommendations: &self.recommendations,
            manifold: &self.manifold,
            evaluation: &self.evaluation,
        }
    }
}

/// Builds the case-folded index; on collisions the lexicographically first key wins
fn fold_titles(recommendations: &HashMap<String, Vec<Candidate>>) -> HashMap<String, String> {
    let mut keys: Vec<&String> = recommendations.keys().collect();
    keys.sort();

    let mut folded = HashMap::with_capacity(keys.len());
    for key in keys {
        folded
            .entry(key.trim().to_lowercase())
            .or_insert_with(|| key.clone());
    }
    folded
}

fn read_required<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let text = fs::read_to_string(path).map_err(|e| dataset_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| dataset_error(path, e))
}

fn read_optional(path: &Path) -> Vec<EvaluationMetric> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Optional dataset absent");
        return Vec::new();
    }

    match read_required(path) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable optional dataset");
            Vec::new()
        }
    }
}

fn dataset_error(path: &Path, reason: impl std::fmt::Display) -> AppError {
    AppError::Dataset {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
