//! Server-side HTML rendering for the dashboard.
//!
//! Every renderer is a function of the dataset context, the selection and the
//! requested view. Charts are emitted as Plotly figure JSON inside
//! `<script type="application/json" class="plotly-figure">` blocks that the
//! page script draws once their panel is visible.

use serde::Serialize;
use serde_json::Value;

use crate::{
    dataset::DatasetContext,
    error::{AppError, AppResult},
    services::{analytics, recommendations, Enrichment, Selection, View},
};

pub mod analytics_view;
pub mod assets;
pub mod embed;
pub mod evaluation_view;
pub mod manifold_view;
pub mod page;
pub mod pipeline_view;
pub mod recommendations_view;

pub use assets::Assets;
pub use embed::EmbedRenderer;

/// Renders the body of one view for the current selection
pub async fn render_view(
    context: &DatasetContext,
    selection: &Selection,
    view: View,
    enrichment: &Enrichment,
) -> String {
    match view {
        View::Recommendations => match selection.title() {
            Some(title) => {
                let model = recommendations::build_view(context, title, enrichment).await;
                recommendations_view::render(&model)
            }
            None => no_selection(),
        },
        View::Analytics => match selection.title() {
            Some(title) => analytics_view::render(&analytics::build_view(context, title)),
            None => no_selection(),
        },
        View::Manifold => manifold_view::render(context.manifold()),
        View::Evaluation => evaluation_view::render(context.evaluation()),
        View::Pipeline => pipeline_view::render(context),
    }
}

fn no_selection() -> String {
    r#"<div class="warning-state">The catalog is empty; there is no movie to select.</div>"#
        .to_string()
}

/// "No recommendations" state shared by the list and the analytics charts
pub(crate) fn empty_state(title: &str) -> String {
    format!(
        r#"<div class="empty-state">No recommendations found for "{}".</div>"#,
        html_escape(title)
    )
}

/// Escape HTML special characters
pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// JSON that is safe to place inside a `<script>` element
///
/// `<` only ever appears inside JSON strings, where `<` is equivalent.
pub(crate) fn script_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map(|json| json.replace('<', "\\u003c"))
        .map_err(|e| AppError::Internal(format!("Failed to serialize page data: {}", e)))
}

/// A chart container plus the figure that fills it
pub(crate) fn figure_block(target_id: &str, class: &str, figure: &Value) -> String {
    format!(
        concat!(
            r#"<div id="{id}" class="{class}"></div>"#,
            "\n",
            r#"<script type="application/json" class="plotly-figure" data-target="{id}">{json}</script>"#,
        ),
        id = target_id,
        class = class,
        json = figure.to_string().replace('<', "\\u003c"),
    )
}

/// Layout defaults shared by every chart
pub(crate) fn base_layout(title: &str) -> Value {
    serde_json::json!({
        "title": { "text": title },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "font": { "color": "#888", "family": "JetBrains Mono, monospace" },
        "margin": { "l": 60, "r": 20, "t": 50, "b": 120 }
    })
}
