//! Relevance scorers.
//!
//! Two named strategies share the 0..=100 contract and monotonicity in
//! their recency input:
//! - `score_trend` ranks candidates scraped from a trending page using
//!   the volume / recency / growth texts the cascade extracted;
//! - `score_feed_item` ranks feed-shaped items by recency decay blended
//!   with keyword density.
//! Both are pure, deterministic heuristics, not fitted models: more
//! recent + higher volume + higher growth never ranks lower.

use chrono::{DateTime, Utc};

use crate::lexicon::TOPICAL_KEYWORDS;

const BASE_SCORE: i32 = 50;

/// Score a scraped trend candidate from its extracted field texts.
pub fn score_trend(
    search_volume: Option<&str>,
    started: Option<&str>,
    percentage: Option<&str>,
) -> u8 {
    let mut score = BASE_SCORE;
    score += volume_bonus(search_volume);
    score += recency_bonus(started);
    score += growth_bonus(percentage);
    score.clamp(0, 100) as u8
}

fn volume_bonus(search_volume: Option<&str>) -> i32 {
    let Some(volume) = search_volume else { return 0 };
    let volume = volume.to_lowercase();
    if volume.contains('+') || volume.contains("high") || volume.contains("very") {
        30
    } else if volume.contains("medium") || volume.contains("moderate") {
        15
    } else {
        0
    }
}

fn recency_bonus(started: Option<&str>) -> i32 {
    let Some(started) = started else { return 0 };
    let started = started.to_lowercase();
    if started.contains("hour") || started.contains("now") {
        20
    } else if started.contains("day") {
        10
    } else {
        0
    }
}

fn growth_bonus(percentage: Option<&str>) -> i32 {
    let Some(percentage) = percentage else { return 0 };
    let digits: String = percentage
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let Ok(magnitude) = digits.parse::<u64>() else { return 0 };
    match magnitude {
        m if m >= 10_000 => 30,
        m if m >= 1_000 => 25,
        m if m >= 500 => 20,
        m if m >= 200 => 15,
        m if m >= 100 => 10,
        m if m >= 50 => 5,
        _ => 0,
    }
}

/// Score a feed-shaped item: 70% linear recency decay (-2 points per
/// hour since publish) blended with 30% topical keyword density.
pub fn score_feed_item(published: DateTime<Utc>, now: DateTime<Utc>, text: &str) -> u8 {
    let hours_old = (now - published).num_hours().max(0) as f64;
    let recency = (100.0 - 2.0 * hours_old).clamp(0.0, 100.0);
    let density = keyword_density(text);
    let blended = 0.7 * recency + 0.3 * density;
    blended.round().clamp(0.0, 100.0) as u8
}

fn keyword_density(text: &str) -> f64 {
    let text = text.to_lowercase();
    let hits = TOPICAL_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .count() as f64;
    (hits * 20.0).min(100.0)
}
