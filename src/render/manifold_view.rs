use serde_json::{json, Value};

use crate::models::ManifoldPoint;

use super::{base_layout, figure_block};

pub const MANIFOLD_CHART_ID: &str = "manifold-chart";

/// One marker per point, hover label is the title
pub fn render(points: &[ManifoldPoint]) -> String {
    if points.is_empty() {
        return r#"<div class="warning-state">Manifold data is not available. Export manifold.json to enable this view.</div>"#
            .to_string();
    }

    format!(
        "<div class=\"tech-header\">3D SIMILARITY MANIFOLD ({} MOVIES)</div>\n{}\n",
        points.len(),
        figure_block(MANIFOLD_CHART_ID, "manifold-chart", &figure(points))
    )
}

pub fn figure(points: &[ManifoldPoint]) -> Value {
    let axis = json!({
        "showbackground": true,
        "backgroundcolor": "rgba(100,100,100,0.1)",
        "gridcolor": "rgba(200,200,200,0.3)",
        "zerolinecolor": "rgba(200,200,200,0.3)",
        "title": "",
        "tickfont": { "size": 10, "color": "#888" }
    });

    let mut layout = base_layout("");
    layout["margin"] = json!({ "l": 0, "r": 0, "b": 10, "t": 0 });
    layout["height"] = json!(700);
    layout["scene"] = json!({ "xaxis": axis, "yaxis": axis, "zaxis": axis });

    json!({
        "data": [{
            "type": "scatter3d",
            "mode": "markers",
            "x": points.iter().map(|p| p.x).collect::<Vec<_>>(),
            "y": points.iter().map(|p| p.y).collect::<Vec<_>>(),
            "z": points.iter().map(|p| p.z).collect::<Vec<_>>(),
            "text": points.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            "hoverinfo": "text",
            "marker": {
                "size": 3.5,
                "color": points.iter().map(|p| p.z).collect::<Vec<_>>(),
                "colorscale": "Plasma",
                "opacity": 0.85,
                "line": { "width": 0 }
            }
        }],
        "layout": layout
    })
}
