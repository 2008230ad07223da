use std::fmt::Display;

use serde::Serialize;

const UPLIFTING_WORDS: [&str; 10] = [
    "exciting",
    "love",
    "hero",
    "fun",
    "happy",
    "adventure",
    "great",
    "brilliant",
    "wonderful",
    "joy",
];

const DARK_WORDS: [&str; 10] = [
    "death", "murder", "scary", "blood", "terror", "dark", "evil", "ghost", "war", "tragedy",
];

/// Coarse mood of a synopsis, from keyword counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Vibe {
    #[serde(rename = "DARK / GRITTY")]
    Dark,
    #[serde(rename = "UPLIFTING / HEROIC")]
    Uplifting,
    #[serde(rename = "BALANCED / MYSTERIOUS")]
    Balanced,
}

impl Vibe {
    pub fn label(self) -> &'static str {
        match self {
            Vibe::Dark => "DARK / GRITTY",
            Vibe::Uplifting => "UPLIFTING / HEROIC",
            Vibe::Balanced => "BALANCED / MYSTERIOUS",
        }
    }
}

impl Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts whitespace-separated words that exactly match a keyword list
///
/// Punctuation is not stripped, so `"war."` does not count as `"war"`. Ties
/// (including no matches at all) are balanced.
pub fn analyze_vibe(text: &str) -> Vibe {
    let (mut uplifting, mut dark) = (0usize, 0usize);

    for word in text.split_whitespace().map(str::to_lowercase) {
        if UPLIFTING_WORDS.contains(&word.as_str()) {
            uplifting += 1;
        } else if DARK_WORDS.contains(&word.as_str()) {
            dark += 1;
        }
    }

    match dark.cmp(&uplifting) {
        std::cmp::Ordering::Greater => Vibe::Dark,
        std::cmp::Ordering::Less => Vibe::Uplifting,
        std::cmp::Ordering::Equal => Vibe::Balanced,
    }
}
