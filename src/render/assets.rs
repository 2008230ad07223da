use std::fs;
use std::path::Path;

/// Placeholder replaced by an inline `<style>` block when embedding
pub const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="style.css">"#;

/// Placeholder replaced by inline script plus injected data when embedding
pub const SCRIPT_TAG: &str = r#"<script src="app.js"></script>"#;

/// Where the server-rendered dashboard content goes
pub const CONTENT_MARKER: &str = "<!-- cinematch:content -->";

const DEFAULT_INDEX_HTML: &str = include_str!("../../static/index.html");
const DEFAULT_STYLE_CSS: &str = include_str!("../../static/style.css");
const DEFAULT_APP_JS: &str = include_str!("../../static/app.js");

/// The page template, stylesheet and client script
#[derive(Debug, Clone, PartialEq)]
pub struct Assets {
    pub index_html: String,
    pub style_css: String,
    pub app_js: String,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            index_html: DEFAULT_INDEX_HTML.to_string(),
            style_css: DEFAULT_STYLE_CSS.to_string(),
            app_js: DEFAULT_APP_JS.to_string(),
        }
    }
}

impl Assets {
    /// Reads overrides from `dir`; any file that is absent or unreadable keeps its built-in copy
    pub fn load(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            index_html: read_or(dir, "index.html", defaults.index_html),
            style_css: read_or(dir, "style.css", defaults.style_css),
            app_js: read_or(dir, "app.js", defaults.app_js),
        }
    }
}

fn read_or(dir: &Path, name: &str, fallback: String) -> String {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => {
            tracing::debug!(path = %path.display(), "Loaded asset override");
            text
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Using built-in asset");
            fallback
        }
    }
}
