use crate::{
    dataset::DatasetContext,
    services::{Enrichment, Selection, View},
};

use super::{assets::CONTENT_MARKER, html_escape, render_view, Assets};

/// Search box, tab strip and one panel per view, with `active` shown
///
/// `view_param` names the query parameter that carries the active view when
/// the search form is submitted without script support.
pub async fn render_content(
    context: &DatasetContext,
    selection: &Selection,
    active: View,
    enrichment: &Enrichment,
    view_param: &str,
) -> String {
    let mut html = search_box(selection, active, view_param);
    html.push_str(&tabs(active));

    for view in View::ALL {
        let body = render_view(context, selection, view, enrichment).await;
        html.push_str(&format!(
            "<section class=\"tab-panel{active}\" id=\"tab-{tag}\">\n{body}</section>\n",
            active = if view == active { " active" } else { "" },
            tag = view.tag(),
            body = body,
        ));
    }

    html
}

fn search_box(selection: &Selection, active: View, view_param: &str) -> String {
    format!(
        r#"<div class="select-wrapper">
    <form method="get">
        <input id="movie-search" name="title" type="text" autocomplete="off" placeholder="Search a movie..." value="{title}">
        <input type="hidden" name="{param}" value="{view}">
    </form>
    <div id="autocomplete-dropdown" class="autocomplete-dropdown"></div>
</div>
"#,
        title = html_escape(selection.title().unwrap_or_default()),
        param = html_escape(view_param),
        view = active.tag(),
    )
}

fn tabs(active: View) -> String {
    let buttons: String = View::ALL
        .into_iter()
        .map(|view| {
            format!(
                r#"<button class="tab-btn{active}" type="button" data-tab="{tag}">{label}</button>"#,
                active = if view == active { " active" } else { "" },
                tag = view.tag(),
                label = view.label(),
            )
        })
        .collect();

    format!("<nav class=\"tabs\">{}</nav>\n", buttons)
}

/// Full page referencing `style.css` and `app.js` by URL
pub fn standalone(assets: &Assets, content: &str) -> String {
    assets.index_html.replacen(CONTENT_MARKER, content, 1)
}

/// Shown in place of the dashboard when a required dataset failed to load
pub const UNAVAILABLE_CONTENT: &str = r#"<div class="fatal-state">
    <p class="headline">DATA ARTIFACTS NOT FOUND</p>
    <p class="detail">Run the export pipeline to generate movies.json, recommendations.json and manifold.json, then restart the server.</p>
</div>
"#;

/// Standalone error page for a missing dataset
pub fn unavailable(assets: &Assets) -> String {
    standalone(assets, UNAVAILABLE_CONTENT)
}
