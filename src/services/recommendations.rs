use serde::Serialize;

use crate::{
    dataset::DatasetContext,
    format::{format_count, format_score, humanize_feature},
    models::{Candidate, FeatureCount},
    services::{profile::TargetProfile, Enrichment},
};

/// Candidates shown per selected title
pub const TOP_N: usize = 10;

/// Feature tags shown per candidate
pub const MAX_FEATURE_TAGS: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureTag {
    pub feature: String,
    pub label: String,
    pub count: f64,
    pub count_display: String,
}

impl From<&FeatureCount> for FeatureTag {
    fn from(feature: &FeatureCount) -> Self {
        Self {
            feature: feature.name.clone(),
            label: humanize_feature(&feature.name),
            count: feature.count,
            count_display: format_count(feature.count),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationCard {
    pub rank: usize,
    pub id: i64,
    pub title: String,
    pub score: f64,
    pub score_display: String,
    pub poster_url: String,
    pub features: Vec<FeatureTag>,
}

/// The best-scoring candidate, shown above the grid with every shared feature
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrimaryTarget {
    pub id: i64,
    pub title: String,
    pub score_display: String,
    pub poster_url: String,
    pub features: Vec<FeatureTag>,
    pub profile: TargetProfile,
}

/// Everything the recommendation list needs for one selected title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationView {
    /// Title as requested
    pub query: String,
    /// Dataset key the query resolved to, if any
    pub matched_title: Option<String>,
    /// First candidate with its profile; `None` when there are no cards
    pub primary: Option<PrimaryTarget>,
    pub cards: Vec<RecommendationCard>,
}

impl RecommendationView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The first [`TOP_N`] candidates for `title`, in source order
///
/// Lists are exported sorted by descending score, so no re-ranking happens here.
pub fn top_candidates<'a>(
    context: &'a DatasetContext,
    title: &str,
) -> Option<(&'a str, &'a [Candidate])> {
    context
        .recommendations_for(title)
        .map(|(key, candidates)| (key, &candidates[..candidates.len().min(TOP_N)]))
}

/// Builds the recommendation list, resolving one poster per candidate
///
/// Posters are resolved one after another; each falls back to the placeholder
/// on its own. The first candidate is also profiled as the primary target.
pub async fn build_view(
    context: &DatasetContext,
    title: &str,
    enrichment: &Enrichment,
) -> RecommendationView {
    let Some((matched, candidates)) = top_candidates(context, title) else {
        tracing::info!(title = %title, "No recommendations for title");
        return RecommendationView {
            query: title.to_string(),
            matched_title: None,
            primary: None,
            cards: Vec::new(),
        };
    };

    let mut cards = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        let poster_url = enrichment
            .posters
            .resolve_poster(candidate.id, Some(candidate.title.as_str()))
            .await;
        cards.push(RecommendationCard {
            rank: index + 1,
            id: candidate.id,
            title: candidate.title.clone(),
            score: candidate.score,
            score_display: format_score(candidate.score),
            poster_url,
            features: candidate
                .features
                .iter()
                .take(MAX_FEATURE_TAGS)
                .map(FeatureTag::from)
                .collect(),
        });
    }

    let primary = match (candidates.first(), cards.first()) {
        (Some(top), Some(card)) => Some(PrimaryTarget {
            id: top.id,
            title: top.title.clone(),
            score_display: card.score_display.clone(),
            poster_url: card.poster_url.clone(),
            features: top.features.iter().map(FeatureTag::from).collect(),
            profile: enrichment.profiler.profile(top.id, &top.title).await,
        }),
        _ => None,
    };

    tracing::debug!(title = %matched, cards = cards.len(), "Recommendation view built");

    RecommendationView {
        query: title.to_string(),
        matched_title: Some(matched.to_string()),
        primary,
        cards,
    }
}
