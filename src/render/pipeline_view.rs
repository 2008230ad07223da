use crate::dataset::{
    DatasetContext, EVALUATION_FILE, MANIFOLD_FILE, MOVIES_FILE, RECOMMENDATIONS_FILE,
};

use super::html_escape;

/// Offline stages that produce the artifacts this server reads
const STAGES: [(&str, &str); 6] = [
    ("INGEST", "Movie metadata with genres, keywords, cast and crew"),
    ("FEATURE EXTRACTION", "Tokens merged into one tag string per movie"),
    ("VECTORIZATION", "Bag-of-words counts over the shared vocabulary"),
    ("SIMILARITY", "Cosine similarity between every pair of movie vectors"),
    ("PROJECTION", "Vectors reduced to three dimensions for the manifold"),
    ("EXPORT", "Top candidates, shared features and metrics written as JSON"),
];

/// Stage list plus what the loaded artifacts contain
pub fn render(context: &DatasetContext) -> String {
    let stages: String = STAGES
        .iter()
        .enumerate()
        .map(|(index, (name, description))| {
            format!(
                r#"<li class="pipeline-stage"><span class="stage-index">{:02}</span> <span class="stage-name">{}</span> <span class="stage-desc">{}</span></li>
"#,
                index + 1,
                name,
                html_escape(description)
            )
        })
        .collect();

    let evaluation = match context.evaluation().len() {
        0 => "not exported".to_string(),
        methods => methods.to_string(),
    };
    let artifacts = [
        (MOVIES_FILE, "movies", context.movies().len().to_string()),
        (
            RECOMMENDATIONS_FILE,
            "recommendation keys",
            context.recommendation_count().to_string(),
        ),
        (MANIFOLD_FILE, "manifold points", context.manifold().len().to_string()),
        (EVALUATION_FILE, "evaluation methods", evaluation),
    ];
    let rows: String = artifacts
        .iter()
        .map(|(file, what, count)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td class=\"metric\">{}</td></tr>\n",
                file, what, count
            )
        })
        .collect();

    format!(
        r#"<div class="tech-header">PIPELINE ARCHITECTURE</div>
<ol class="pipeline">
{stages}</ol>
<div class="tech-header">LOADED ARTIFACTS</div>
<table class="metrics-table">
<thead><tr><th>FILE</th><th>CONTENTS</th><th>COUNT</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<div class="pipeline-footer">Loaded at {loaded_at}</div>
"#,
        stages = stages,
        rows = rows,
        loaded_at = context.loaded_at().format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
