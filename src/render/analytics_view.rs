use serde_json::{json, Value};

use crate::services::analytics::{AnalyticsView, FeatureTotal, ScoreBar};

use super::{base_layout, empty_state, figure_block, html_escape};

pub const SCORE_CHART_ID: &str = "score-chart";
pub const FEATURE_CHART_ID: &str = "feature-chart";

/// Score bars plus the aggregated feature-frequency chart
pub fn render(view: &AnalyticsView) -> String {
    let matched = match &view.matched_title {
        Some(matched) if !view.is_empty() => matched,
        _ => return empty_state(&view.query),
    };

    let features = if view.features.is_empty() {
        r#"<div class="warning-state">No shared features recorded for these candidates.</div>"#
            .to_string()
    } else {
        figure_block(FEATURE_CHART_ID, "chart", &feature_figure(&view.features))
    };

    format!(
        r#"<div class="tech-header">SIMILARITY ANALYTICS FOR: {}</div>
{}
<div class="tech-header">SHARED FEATURE FREQUENCY</div>
{}
"#,
        html_escape(matched),
        figure_block(SCORE_CHART_ID, "chart", &score_figure(&view.scores)),
        features
    )
}

pub fn score_figure(scores: &[ScoreBar]) -> Value {
    let mut layout = base_layout("Cosine similarity of top candidates");
    layout["yaxis"] = json!({ "title": { "text": "score" } });
    layout["xaxis"] = json!({ "tickangle": -35 });

    json!({
        "data": [{
            "type": "bar",
            "x": scores.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            "y": scores.iter().map(|s| s.score).collect::<Vec<_>>(),
            "hovertext": scores.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            "text": scores.iter().map(|s| s.score_display.as_str()).collect::<Vec<_>>(),
            "marker": { "color": "#00ff41" }
        }],
        "layout": layout
    })
}

/// Horizontal bars; input is already ascending so the largest bar ends up on top
pub fn feature_figure(features: &[FeatureTotal]) -> Value {
    let mut layout = base_layout("Most frequent shared features");
    layout["margin"]["l"] = json!(180);
    layout["margin"]["b"] = json!(40);
    layout["xaxis"] = json!({ "title": { "text": "total count" } });

    json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": features.iter().map(|f| f.total).collect::<Vec<_>>(),
            "y": features.iter().map(|f| f.label.as_str()).collect::<Vec<_>>(),
            "marker": { "color": "#ffcc00" }
        }],
        "layout": layout
    })
}
