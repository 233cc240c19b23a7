//! Candidate validation: rejects UI chrome and malformed rows so only
//! human-meaningful topics flow downstream.
//!
//! Pure filter; input ordering is preserved. Rules are applied in order
//! and a candidate is rejected on the first match.

use tracing::trace;

use crate::topic::RawCandidate;

/// Titles containing any of these (case-insensitively) are page chrome,
/// not topics: column labels, controls, navigation.
pub const UI_NOISE_PHRASES: &[&str] = &[
    "trend breakdown",
    "search volume",
    "sort by",
    "more actions",
    "trending now",
    "daily search trends",
    "realtime search trends",
    "privacy policy",
    "terms of service",
    "send feedback",
    "sign in",
    "settings",
    "language",
    "export",
    "filter by",
    "all categories",
    "past 24 hours",
];

const MIN_TITLE_CHARS: usize = 2;
const MAX_TITLE_CHARS: usize = 100;

/// How strictly to treat candidates without volume/recency fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Drop candidates with neither search volume nor started resolved.
    /// Used for the structured-row strategy, where an unresolved pair
    /// means the row parse failed.
    RequireSignal,
    /// Keep bare titles. Used for strategies that by contract carry no
    /// field data (link harvest, heading fallback).
    TitleOnly,
}

/// Filter raw candidates down to plausible topics.
pub fn filter_candidates(candidates: Vec<RawCandidate>, policy: FieldPolicy) -> Vec<RawCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            if let Some(reason) = rejection_reason(candidate, policy) {
                trace!(title = %candidate.title, reason, "rejected candidate");
                false
            } else {
                true
            }
        })
        .collect()
}

fn rejection_reason(candidate: &RawCandidate, policy: FieldPolicy) -> Option<&'static str> {
    let title = candidate.title.trim();
    let chars = title.chars().count();
    if chars < MIN_TITLE_CHARS || chars > MAX_TITLE_CHARS {
        return Some("title length");
    }
    if !title.chars().any(|c| c.is_alphabetic()) {
        return Some("title without letters");
    }
    let lowered = title.to_lowercase();
    if UI_NOISE_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
        return Some("ui noise");
    }
    if policy == FieldPolicy::RequireSignal && candidate.has_no_signal() {
        return Some("no resolved fields");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_volume(title: &str) -> RawCandidate {
        RawCandidate {
            search_volume: Some("20K+".to_string()),
            ..RawCandidate::bare(title)
        }
    }

    #[test]
    fn test_title_length_bounds() {
        let kept = filter_candidates(
            vec![
                with_volume("a"),
                with_volume("ok"),
                with_volume(&"x".repeat(101)),
            ],
            FieldPolicy::RequireSignal,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "ok");
    }

    #[test]
    fn test_noise_lexicon_rejects_chrome() {
        let kept = filter_candidates(
            vec![
                with_volume("Trend Breakdown"),
                with_volume("Sort By relevance"),
                with_volume("Search Volume"),
                with_volume("Election Reform"),
            ],
            FieldPolicy::RequireSignal,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Election Reform");
    }

    #[test]
    fn test_numeric_only_title_rejected() {
        let kept = filter_candidates(vec![with_volume("2025")], FieldPolicy::RequireSignal);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_require_signal_drops_bare_candidates() {
        let partially_useful = RawCandidate {
            started: Some("2 hours ago".to_string()),
            ..RawCandidate::bare("Ballot Measure Recount")
        };
        let kept = filter_candidates(
            vec![
                RawCandidate::bare("Ballot Measure Recount"),
                partially_useful.clone(),
            ],
            FieldPolicy::RequireSignal,
        );
        // One resolved field is enough; none is not.
        assert_eq!(kept, vec![partially_useful]);
    }

    #[test]
    fn test_title_only_keeps_bare_candidates() {
        let kept = filter_candidates(
            vec![RawCandidate::bare("Ballot Measure Recount")],
            FieldPolicy::TitleOnly,
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_ordering_preserved() {
        let kept = filter_candidates(
            vec![
                with_volume("First Topic"),
                with_volume("Sort By"),
                with_volume("Second Topic"),
                with_volume("Third Topic"),
            ],
            FieldPolicy::RequireSignal,
        );
        let titles: Vec<&str> = kept.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["First Topic", "Second Topic", "Third Topic"]);
    }
}
