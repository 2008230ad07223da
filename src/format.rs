//! Display formatting shared by the HTML renderers and the JSON API.

/// `"christopher_nolan"` -> `"Christopher Nolan"`
pub fn humanize_feature(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Similarity score rounded to 4 decimals
pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}

/// Feature counts are usually whole numbers; weighted exports carry fractions
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 && count.abs() < 1e15 {
        format!("{}", count as i64)
    } else {
        format!("{:.3}", count)
    }
}

/// Truncates to `max_chars` characters, appending `...` when anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
