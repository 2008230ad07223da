use crate::services::{
    providers::MovieDetails,
    recommendations::{FeatureTag, PrimaryTarget, RecommendationCard, RecommendationView},
};

use super::{empty_state, html_escape};

/// Primary target block followed by the ranked recommendation cards
pub fn render(view: &RecommendationView) -> String {
    let matched = match &view.matched_title {
        Some(matched) if !view.is_empty() => matched,
        _ => return empty_state(&view.query),
    };

    let primary = view.primary.as_ref().map(render_primary).unwrap_or_default();
    let cards: String = view.cards.iter().map(render_card).collect();

    format!(
        r#"{primary}<div class="tech-header">LATENT CLUSTER PROJECTIONS FOR: {matched}</div>
<div class="recs-grid">
{cards}</div>
"#,
        primary = primary,
        matched = html_escape(matched),
        cards = cards
    )
}

fn render_primary(target: &PrimaryTarget) -> String {
    let profile = &target.profile;
    let title = html_escape(&target.title);
    let details = profile
        .details
        .as_ref()
        .map(|details| render_details(details, &title))
        .unwrap_or_default();
    let features: String = target.features.iter().map(render_feature_row).collect();

    format!(
        r#"<div class="tech-header">PRIMARY TARGET LOCK</div>
<div class="primary-target" data-movie-id="{id}">
    <div class="primary-poster"><img src="{poster}" class="poster-img" alt="{title}" loading="lazy"></div>
    <div class="primary-details">
        <h1>{title}</h1>
        <div class="vibe-tag"><span class="sigma-badge">VIBE_ANALYSIS</span> <span class="vibe-label">{vibe}</span></div>
{details}        <div class="cosine-display">
            <div class="cosine-score">COSINE SIMILARITY: {score}</div>
            <div class="feature-breakdown">
                <div class="feature-header">TOP SHARED FEATURES:</div>
{features}            </div>
        </div>
        <div class="wiki-block">{summary}</div>
    </div>
</div>
"#,
        id = target.id,
        poster = html_escape(&target.poster_url),
        title = title,
        vibe = html_escape(profile.vibe.label()),
        details = details,
        score = target.score_display,
        features = features,
        summary = html_escape(&profile.summary),
    )
}

fn render_details(details: &MovieDetails, title: &str) -> String {
    let mut html = format!(
        r#"        <div class="detail-badges">
            <span class="sigma-badge">RATING</span> <span class="detail-value">{rating}</span>
            <span class="sigma-badge">RELEASE</span> <span class="detail-value">{release}</span>
            <span class="sigma-badge">RUNTIME</span> <span class="detail-value">{runtime}</span>
        </div>
"#,
        rating = details.rating_display(),
        release = html_escape(details.release_display()),
        runtime = details.runtime_display(),
    );

    if let Some(key) = &details.trailer_key {
        html.push_str(&format!(
            r#"        <div class="trailer-embed"><iframe src="https://www.youtube.com/embed/{key}?rel=0" allowfullscreen title="Trailer for {title}"></iframe></div>
"#,
            key = urlencoding::encode(key),
            title = title,
        ));
    }

    html
}

fn render_feature_row(tag: &FeatureTag) -> String {
    format!(
        r#"                <div class="feature-row"><span class="feat-name">{label}</span><span class="feat-score">{count}</span></div>
"#,
        label = html_escape(&tag.label),
        count = tag.count_display,
    )
}

fn render_card(card: &RecommendationCard) -> String {
    let tags: String = card.features.iter().map(render_tag).collect();

    format!(
        r#"<div class="rec-card" data-movie-id="{id}">
    <div class="rank">#{rank}</div>
    <img src="{poster}" class="poster-img" alt="{title}" loading="lazy">
    <a class="rec-btn" href="?title={link}">ANALYZE &rarr;</a>
    <div class="movie-title-label">{title}</div>
    <div class="cosine-score">COSINE SIMILARITY: {score}</div>
    <div class="feature-tags">{tags}</div>
</div>
"#,
        id = card.id,
        rank = card.rank,
        poster = html_escape(&card.poster_url),
        link = urlencoding::encode(&card.title),
        title = html_escape(&card.title),
        score = card.score_display,
        tags = tags,
    )
}

fn render_tag(tag: &FeatureTag) -> String {
    format!(
        r#"<span class="feature-tag" title="{raw}"><span class="feat-name">{label}</span><span class="feat-score">{count}</span></span>"#,
        raw = html_escape(&tag.feature),
        label = html_escape(&tag.label),
        count = tag.count_display,
    )
}
