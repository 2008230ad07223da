use std::collections::HashMap;

use serde::Serialize;

use crate::{
    dataset::DatasetContext,
    format::{format_score, humanize_feature, truncate_chars},
    models::Candidate,
    services::recommendations::{top_candidates, TOP_N},
};

/// Features kept in the frequency chart
pub const TOP_FEATURES: usize = 15;

/// Score chart labels are cut to this many characters
pub const SCORE_LABEL_CHARS: usize = 20;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBar {
    pub label: String,
    pub title: String,
    pub score: f64,
    pub score_display: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureTotal {
    pub feature: String,
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsView {
    pub query: String,
    pub matched_title: Option<String>,
    pub scores: Vec<ScoreBar>,
    /// Ascending by total, ready for a horizontal bar chart
    pub features: Vec<FeatureTotal>,
}

impl AnalyticsView {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// One bar per candidate among the first [`TOP_N`]
pub fn score_series(candidates: &[Candidate]) -> Vec<ScoreBar> {
    candidates
        .iter()
        .take(TOP_N)
        .map(|candidate| ScoreBar {
            label: truncate_chars(&candidate.title, SCORE_LABEL_CHARS),
            title: candidate.title.clone(),
            score: candidate.score,
            score_display: format_score(candidate.score),
        })
        .collect()
}

/// Sums counts per raw feature name across the first [`TOP_N`] candidates
///
/// Totals come back in first-seen order.
pub fn aggregate_features(candidates: &[Candidate]) -> Vec<FeatureTotal> {
    let mut totals: Vec<FeatureTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for feature in candidates.iter().take(TOP_N).flat_map(|c| &c.features) {
        match index.get(feature.name.as_str()) {
            Some(&slot) => totals[slot].total += feature.count,
            None => {
                index.insert(feature.name.as_str(), totals.len());
                totals.push(FeatureTotal {
                    feature: feature.name.clone(),
                    label: humanize_feature(&feature.name),
                    total: feature.count,
                });
            }
        }
    }

    totals
}

/// The [`TOP_FEATURES`] highest totals, sorted ascending
///
/// Both sorts are stable, so equal totals keep first-seen order.
pub fn top_features(candidates: &[Candidate]) -> Vec<FeatureTotal> {
    let mut totals = aggregate_features(candidates);
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(TOP_FEATURES);
    totals.sort_by(|a, b| a.total.total_cmp(&b.total));
    totals
}

pub fn build_view(context: &DatasetContext, title: &str) -> AnalyticsView {
    match top_candidates(context, title) {
        Some((matched, candidates)) => AnalyticsView {
            query: title.to_string(),
            matched_title: Some(matched.to_string()),
            scores: score_series(candidates),
            features: top_features(candidates),
        },
        None => AnalyticsView {
            query: title.to_string(),
            matched_title: None,
            scores: Vec::new(),
            features: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::candidate;

    #[test]
    fn test_score_series_truncates_labels() {
        let candidates = vec![
            candidate(1, "Eternal Sunshine of the Spotless Mind", 0.81, &[]),
            candidate(2, "Heat", 0.5, &[]),
        ];

        let bars = score_series(&candidates);

        assert_eq!(bars[0].label, "Eternal Sunshine of ...");
        assert_eq!(bars[0].title, "Eternal Sunshine of the Spotless Mind");
        assert_eq!(bars[1].label, "Heat");
        assert_eq!(bars[1].score, 0.5);
    }

    #[test]
    fn test_aggregate_sums_raw_counts() {
        let candidates = vec![
            candidate(1, "A", 0.9, &[("nolan", 2.0), ("dream", 1.0)]),
            candidate(2, "B", 0.8, &[("dream", 3.0)]),
            candidate(3, "C", 0.7, &[("nolan", 1.0), ("heist", 1.0)]),
        ];

        let totals = aggregate_features(&candidates);

        let as_pairs: Vec<(&str, f64)> =
            totals.iter().map(|t| (t.feature.as_str(), t.total)).collect();
        assert_eq!(as_pairs, vec![("nolan", 3.0), ("dream", 4.0), ("heist", 1.0)]);
    }

    #[test]
    fn test_aggregate_ignores_candidates_past_top_ten() {
        let mut candidates: Vec<Candidate> = (0..10)
            .map(|i| candidate(i, "X", 0.5, &[("shared", 1.0)]))
            .collect();
        candidates.push(candidate(99, "Eleventh", 0.1, &[("shared", 100.0), ("late", 5.0)]));

        let totals = aggregate_features(&candidates);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 10.0);
    }

    #[test]
    fn test_top_features_keeps_fifteen_highest_ascending() {
        let features: Vec<(String, f64)> =
            (0..20).map(|i| (format!("feature_{}", i), i as f64)).collect();
        let borrowed: Vec<(&str, f64)> = features.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        let candidates = vec![candidate(1, "A", 0.9, &borrowed)];

        let top = top_features(&candidates);

        assert_eq!(top.len(), TOP_FEATURES);
        assert_eq!(top.first().unwrap().feature, "feature_5");
        assert_eq!(top.last().unwrap().feature, "feature_19");
        assert_eq!(top.last().unwrap().label, "Feature 19");
        assert!(top.windows(2).all(|w| w[0].total <= w[1].total));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let candidates = vec![candidate(1, "A", 0.9, &[("b_side", 1.0), ("a_side", 1.0)])];

        let top = top_features(&candidates);

        assert_eq!(top[0].feature, "b_side");
        assert_eq!(top[1].feature, "a_side");
    }
}
