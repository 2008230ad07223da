//! Self-contained dashboard fragment for re-hosting inside another page.
//!
//! The stylesheet and client script are inlined, and the dataset is injected
//! as `window.__CINEMATCH_DATA__` so the fragment needs no further requests
//! for its own assets. The injected `loadAllData` / `loadEvaluationData`
//! replace the standalone loaders from `app.js`.

use crate::{
    dataset::DatasetContext,
    error::AppResult,
    services::View,
};

use super::{
    assets::{CONTENT_MARKER, SCRIPT_TAG, STYLESHEET_LINK},
    page::UNAVAILABLE_CONTENT,
    script_json, Assets,
};

const BOOTSTRAP_SCRIPT: &str = r#"<script>
window.__CINEMATCH_INITIAL_VIEW__ = __INITIAL_VIEW__;
window.__CINEMATCH_DATA__ = __DATA__;

function loadAllData() {
    try {
        const injected = window.__CINEMATCH_DATA__ || {};
        moviesData = injected.movies || [];
        recommendationsData = injected.recommendations || {};
        manifoldData = injected.manifold || [];
        dataLoaded = true;
        loadEvaluationData();
    } catch (e) {
        console.error('Injected data load failed:', e);
    }
}

function loadEvaluationData() {
    try {
        const data = (window.__CINEMATCH_DATA__ || {}).evaluation || [];
        data.forEach(item => {
            const method = (item.method || '').toLowerCase();
            const precEl = document.getElementById(`${method}-precision`);
            const latEl = document.getElementById(`${method}-latency`);
            if (precEl) precEl.textContent = Number(item.precision).toFixed(4);
            if (latEl) latEl.textContent = Number(item.latency).toFixed(2) + 'ms';
        });
    } catch (e) {
        console.warn('Evaluation inject failed:', e);
    }
}
</script>"#;

/// Builds the embeddable fragment
///
/// The initial view is fixed at construction: the matching panel is rendered
/// active and its tag is exposed to the client as
/// `window.__CINEMATCH_INITIAL_VIEW__`.
pub struct EmbedRenderer<'a> {
    assets: &'a Assets,
    initial_view: Option<View>,
}

impl<'a> EmbedRenderer<'a> {
    pub fn new(assets: &'a Assets, initial_view: Option<View>) -> Self {
        Self {
            assets,
            initial_view,
        }
    }

    /// View whose panel is rendered active
    pub fn active_view(&self) -> View {
        self.initial_view.unwrap_or_default()
    }

    /// Wraps rendered dashboard `content` into the fragment
    pub fn render(&self, context: &DatasetContext, content: &str) -> AppResult<String> {
        let initial_view = match self.initial_view {
            Some(view) => script_json(view.tag())?,
            None => "null".to_string(),
        };
        let bootstrap = BOOTSTRAP_SCRIPT
            .replacen("__INITIAL_VIEW__", &initial_view, 1)
            .replacen("__DATA__", &script_json(&context.injected())?, 1);

        let template = &self.assets.index_html;
        for placeholder in [STYLESHEET_LINK, SCRIPT_TAG, CONTENT_MARKER] {
            if !template.contains(placeholder) {
                tracing::warn!(placeholder, "Page template is missing a placeholder; fragment will lack it");
            }
        }

        let html = self
            .inline_style(template)
            .replacen(
                SCRIPT_TAG,
                &format!("<script>\n{}\n</script>\n{}", self.assets.app_js, bootstrap),
                1,
            )
            .replacen(CONTENT_MARKER, content, 1);

        tracing::debug!(
            initial_view = %self.active_view(),
            bytes = html.len(),
            "Embed fragment rendered"
        );

        Ok(html)
    }

    /// Missing-dataset notice that still needs no requests to the server
    ///
    /// The client script is left out: without data it has nothing to draw.
    pub fn render_unavailable(&self) -> String {
        self.inline_style(&self.assets.index_html)
            .replacen(SCRIPT_TAG, "", 1)
            .replacen(CONTENT_MARKER, UNAVAILABLE_CONTENT, 1)
    }

    fn inline_style(&self, template: &str) -> String {
        template.replacen(
            STYLESHEET_LINK,
            &format!("<style>\n{}\n</style>", self.assets.style_css),
            1,
        )
    }
}
