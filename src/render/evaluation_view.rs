use crate::models::EvaluationMetric;

use super::html_escape;

/// Precision/latency table; cells carry `{method}-precision` / `{method}-latency` ids
pub fn render(metrics: &[EvaluationMetric]) -> String {
    if metrics.is_empty() {
        return r#"<div class="warning-state">No evaluation results available.</div>"#.to_string();
    }

    let rows: String = metrics
        .iter()
        .map(|metric| {
            let display = metric.display();
            let key = html_escape(&display.key);
            format!(
                r#"<tr><td>{method}</td><td class="metric" id="{key}-precision">{precision}</td><td class="metric" id="{key}-latency">{latency}</td></tr>
"#,
                method = html_escape(&display.method),
                key = key,
                precision = display.precision,
                latency = display.latency,
            )
        })
        .collect();

    format!(
        r#"<div class="tech-header">OFFLINE EVALUATION</div>
<table class="metrics-table">
<thead><tr><th>METHOD</th><th>PRECISION</th><th>LATENCY</th></tr></thead>
<tbody>
{}</tbody>
</table>
"#,
        rows
    )
}
