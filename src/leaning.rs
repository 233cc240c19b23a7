//! Keyword-weighted political-leaning classifier.
//!
//! Maps a free-text topic title to a signed score in -100..=100
//! (negative = left, positive = right) or `None` when the topic is
//! non-political or carries no detectable signal. Single pass, no
//! external state; the lexicons live in `crate::lexicon`.

use crate::lexicon::{LeaningLexicons, DEFAULT_LEXICONS};

/// Per-word weight for left/right keyword matches.
const PARTISAN_WEIGHT: u32 = 3;
/// Per-word weight for centrist keyword matches.
const CENTRIST_WEIGHT: u32 = 2;
/// Fraction of the centrist bucket applied as dampening toward zero.
const CENTRIST_DAMPENING: f64 = 0.3;

/// Classify a topic title against the production lexicons.
pub fn classify_political_leaning(title: &str) -> Option<i32> {
    classify_with_lexicons(title, &DEFAULT_LEXICONS)
}

/// Classify against caller-supplied lexicons.
///
/// A non-political phrase match returns `None` before any political
/// matching happens, so "election weather forecast" is never
/// force-classified. Multi-word keywords contribute more than
/// single-word ones (word count × weight) as a proxy for specificity.
pub fn classify_with_lexicons(title: &str, lexicons: &LeaningLexicons) -> Option<i32> {
    let text = title.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if lexicons
        .non_political
        .iter()
        .any(|category| category.phrases.iter().any(|p| text.contains(p)))
    {
        return None;
    }

    let left = bucket_score(&text, lexicons.left, PARTISAN_WEIGHT);
    let right = bucket_score(&text, lexicons.right, PARTISAN_WEIGHT);
    let centrist = bucket_score(&text, lexicons.centrist, CENTRIST_WEIGHT);

    let total = left + right + centrist;
    if total == 0 {
        return None;
    }

    let net = right as f64 - left as f64;

    // Pull toward zero by up to 30% of the centrist bucket, never past it.
    let modifier = (centrist as f64 * CENTRIST_DAMPENING).min(net.abs());
    let dampened = if net > 0.0 {
        net - modifier
    } else if net < 0.0 {
        net + modifier
    } else {
        0.0
    };

    // Many weak hits must not read as an extreme score; a single strong
    // signal keeps its raw magnitude.
    let scaled = dampened * (100.0 / total as f64).min(1.0);

    Some(scaled.round().clamp(-100.0, 100.0) as i32)
}

fn bucket_score(text: &str, keywords: &[&str], weight: u32) -> u32 {
    keywords
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.split_whitespace().count() as u32 * weight)
        .sum()
}

/// Human-readable label for a leaning score.
pub fn leaning_label(score: Option<i32>) -> &'static str {
    match score {
        None => "Not Political",
        Some(s) if s <= -60 => "Far Left",
        Some(s) if s < 0 => "Left Leaning",
        Some(s) if s >= 60 => "Far Right",
        Some(s) if s > 0 => "Right Leaning",
        Some(_) => "Center",
    }
}

/// Output category for a topic: the matched non-political category,
/// "Political" when a leaning signal exists, otherwise "General".
pub fn topic_category(title: &str, leaning: Option<i32>) -> &'static str {
    if let Some(category) = non_political_category(title) {
        return category;
    }
    if leaning.is_some() {
        return "Political";
    }
    "General"
}

fn non_political_category(title: &str) -> Option<&'static str> {
    let text = title.trim().to_lowercase();
    DEFAULT_LEXICONS
        .non_political
        .iter()
        .find(|category| category.phrases.iter().any(|p| text.contains(p)))
        .map(|category| category.category)
}
