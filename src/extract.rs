//! Multi-strategy extraction cascade over rendered trending-page markup.
//!
//! The source pages carry no stable schema: class names are anonymous
//! and shift between sessions. Strategies are tried in priority order,
//! richest first, and the cascade advances only when a strategy yields
//! zero validated candidates — a single valid candidate is accepted as
//! final for the pass:
//! 1. structured rows (table/row semantics, full field set)
//! 2. article blocks (heading + link substructure)
//! 3. link harvest (trend-detail anchors outside page chrome)
//! 4. heading fallback (bare titles)
//!
//! Per-field extraction goes through small ordered tables of
//! (pattern, extractor) rules, strict first, looser later. All-empty
//! output is not an error; it means "no data for this region this run".

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::topic::RawCandidate;
use crate::validate::{self, FieldPolicy};

// Selectors are compile-time constants, so parse() cannot fail here.
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr, [role=\"row\"], li").unwrap());

static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());

static FALLBACK_HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3").unwrap());

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Href fragments marking a link as a trend-detail page.
const TREND_DETAIL_MARKERS: &[&str] = &["/trends/explore", "explore?q="];

type Extractor = fn(&Captures) -> Option<String>;

/// A search-volume token: digits, optional magnitude suffix, "+".
/// Bare years ("2025") are handled by the extractor guard, not here.
static VOLUME_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:[.,]\d+)?\s*([KMB])?\+").unwrap());

static VOLUME_RULES: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    vec![
        // "20K+ searches" — the labeled form, tried first.
        (
            Regex::new(r"(?i)(\d+(?:[.,]\d+)?\s*[KMB]?\+?)\s*searches").unwrap(),
            volume_from_caps as Extractor,
        ),
        // Suffixed token anywhere: "2M+".
        (
            Regex::new(r"(\d+(?:[.,]\d+)?[KMB]\+)").unwrap(),
            volume_from_caps,
        ),
        // Loosest: any "N+" token, year guard applies.
        (
            Regex::new(r"(\d+(?:[.,]\d+)?[KMB]?\+)").unwrap(),
            volume_from_caps,
        ),
    ]
});

static STARTED_RULES: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)(\d+\s*(?:minute|hour|day|week)s?\s*ago)").unwrap(),
            group_one as Extractor,
        ),
        (
            Regex::new(r"(?i)\b(yesterday|today|just now)\b").unwrap(),
            group_one,
        ),
        // Compact form some layouts use: "4h", "2d".
        (Regex::new(r"(?i)\b(\d+[mhdw])\b").unwrap(), group_one),
    ]
});

static PERCENT_RULES: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    vec![
        // Thousands-grouped first so "12,000%" is not read as "12%".
        (
            Regex::new(r"(\d{1,3}(?:,\d{3})+)\s*%").unwrap(),
            percent_from_caps as Extractor,
        ),
        (Regex::new(r"(\d+)\s*%").unwrap(), percent_from_caps),
        (
            Regex::new(r"(?i)\bup\s+(\d+(?:,\d{3})*)\b").unwrap(),
            percent_from_caps,
        ),
    ]
});

static BREAKDOWN_RULES: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)trend\s+breakdown[:\s·\-]+([A-Za-z][A-Za-z0-9&', .\-]{2,60})")
                .unwrap(),
            breakdown_from_caps as Extractor,
        ),
        (
            Regex::new(r"(?i)\bbreakdown[:\s·\-]+([A-Za-z][A-Za-z0-9&', .\-]{2,60})").unwrap(),
            breakdown_from_caps,
        ),
    ]
});

/// Result of one full cascade pass. `raw_seen` counts candidates any
/// strategy produced before validation, so callers can tell "nothing
/// extracted" apart from "everything extracted was rejected".
#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    pub topics: Vec<RawCandidate>,
    pub raw_seen: usize,
}

struct Strategy {
    name: &'static str,
    policy: FieldPolicy,
    run: fn(&Html) -> Vec<RawCandidate>,
}

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "structured-rows",
        policy: FieldPolicy::RequireSignal,
        run: extract_structured_rows,
    },
    Strategy {
        name: "article-blocks",
        policy: FieldPolicy::TitleOnly,
        run: extract_article_blocks,
    },
    Strategy {
        name: "link-harvest",
        policy: FieldPolicy::TitleOnly,
        run: extract_link_harvest,
    },
    Strategy {
        name: "heading-fallback",
        policy: FieldPolicy::TitleOnly,
        run: extract_heading_fallback,
    },
];

/// Run the cascade over raw page markup and return validated candidates
/// from the first strategy that produced any.
pub fn run_cascade(html: &str) -> CascadeOutcome {
    let document = Html::parse_document(html);
    let mut raw_seen = 0;
    for strategy in STRATEGIES {
        let raw = (strategy.run)(&document);
        raw_seen += raw.len();
        let kept = validate::filter_candidates(raw, strategy.policy);
        if !kept.is_empty() {
            debug!(
                strategy = strategy.name,
                count = kept.len(),
                "extraction strategy accepted"
            );
            return CascadeOutcome {
                topics: kept,
                raw_seen,
            };
        }
        debug!(strategy = strategy.name, "no validated candidates, falling through");
    }
    CascadeOutcome {
        topics: Vec::new(),
        raw_seen,
    }
}

/// Strategy 1: elements with row/table semantics. A row qualifies only
/// with at least three element children and one cell carrying a volume
/// token.
fn extract_structured_rows(document: &Html) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    for row in document.select(&ROW_SELECTOR) {
        let children: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
        if children.len() < 3 {
            continue;
        }
        let cells: Vec<String> = children
            .iter()
            .map(|cell| collapse_ws(&cell.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect();
        if !cells.iter().any(|cell| has_volume_token(cell)) {
            continue;
        }
        let row_text = cells.join(" ");
        let Some(title) = title_before_first_number(&row_text) else {
            continue;
        };
        candidates.push(RawCandidate {
            title,
            search_volume: first_match(&VOLUME_RULES, &row_text),
            started: first_match(&STARTED_RULES, &row_text),
            breakdown: first_match(&BREAKDOWN_RULES, &row_text),
            percentage: first_match(&PERCENT_RULES, &row_text),
            source_link: first_link(&row),
        });
    }
    candidates
}

/// Strategy 2: `<article>` blocks with heading + link substructure.
fn extract_article_blocks(document: &Html) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    for article in document.select(&ARTICLE_SELECTOR) {
        let Some(heading) = article.select(&HEADING_SELECTOR).next() else {
            continue;
        };
        let title = collapse_ws(&heading.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        let Some(link) = first_link(&article) else {
            continue;
        };
        let text = collapse_ws(&article.text().collect::<String>());
        candidates.push(RawCandidate {
            title,
            search_volume: first_match(&VOLUME_RULES, &text),
            started: first_match(&STARTED_RULES, &text),
            breakdown: None,
            percentage: first_match(&PERCENT_RULES, &text),
            source_link: Some(link),
        });
    }
    candidates
}

/// Strategy 3: anchors pointing at trend-detail pages, excluding any
/// inside navigation/header chrome.
fn extract_link_harvest(document: &Html) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !TREND_DETAIL_MARKERS.iter().any(|marker| href.contains(marker)) {
            continue;
        }
        if in_chrome_region(&anchor) {
            continue;
        }
        let title = collapse_ws(&anchor.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        candidates.push(RawCandidate {
            source_link: Some(href.to_string()),
            ..RawCandidate::bare(title)
        });
    }
    candidates
}

/// Strategy 4: heading text as bare titles, no field data.
fn extract_heading_fallback(document: &Html) -> Vec<RawCandidate> {
    document
        .select(&FALLBACK_HEADING_SELECTOR)
        .map(|heading| collapse_ws(&heading.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .map(RawCandidate::bare)
        .collect()
}

/// Try each rule in order; within a rule, take the first match whose
/// extractor accepts (guard rejections fall through to later matches
/// and rules).
fn first_match(rules: &[(Regex, Extractor)], text: &str) -> Option<String> {
    for (pattern, extract) in rules {
        for caps in pattern.captures_iter(text) {
            if let Some(value) = extract(&caps) {
                return Some(value);
            }
        }
    }
    None
}

fn volume_from_caps(caps: &Captures) -> Option<String> {
    let raw = caps.get(1)?.as_str().trim().to_string();
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    let has_suffix = raw
        .chars()
        .any(|c| matches!(c.to_ascii_uppercase(), 'K' | 'M' | 'B'));
    if !has_suffix && is_year_like(&digits) {
        return None;
    }
    Some(raw)
}

fn group_one(caps: &Captures) -> Option<String> {
    Some(caps.get(1)?.as_str().trim().to_string())
}

fn percent_from_caps(caps: &Captures) -> Option<String> {
    let raw = caps.get(1)?.as_str().trim();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    // Stray zero padding ("000", "0000") is never a real growth figure.
    if digits.is_empty() || digits.chars().all(|c| c == '0') {
        return None;
    }
    Some(format!("{}%", raw))
}

fn breakdown_from_caps(caps: &Captures) -> Option<String> {
    let raw = caps
        .get(1)?
        .as_str()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '-' | '·'))
        .to_string();
    if raw.len() < 3 {
        return None;
    }
    Some(raw)
}

/// True if the text carries a non-year volume token like "20K+".
fn has_volume_token(text: &str) -> bool {
    VOLUME_TOKEN_RE.captures_iter(text).any(|caps| {
        let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        caps.get(2).is_some() || !is_year_like(digits)
    })
}

/// Date text false positive guard: "2025" is a year, not a volume.
fn is_year_like(digits: &str) -> bool {
    digits.len() == 4 && digits.starts_with("20")
}

/// The longest run of alphabetic tokens preceding the first token
/// containing a digit.
fn title_before_first_number(text: &str) -> Option<String> {
    let mut best: Vec<&str> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        if token.chars().any(|c| c.is_ascii_digit()) {
            break;
        }
        if token.chars().any(|c| c.is_alphabetic()) {
            current.push(token);
        } else if run_len(&current) > run_len(&best) {
            std::mem::swap(&mut best, &mut current);
            current.clear();
        } else {
            current.clear();
        }
    }
    if run_len(&current) > run_len(&best) {
        best = current;
    }
    let title = best.join(" ");
    if title.chars().count() < 2 {
        None
    } else {
        Some(title)
    }
}

fn run_len(tokens: &[&str]) -> usize {
    tokens.iter().map(|t| t.chars().count()).sum::<usize>() + tokens.len().saturating_sub(1)
}

fn first_link(element: &ElementRef) -> Option<String> {
    element
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .next()
}

fn in_chrome_region(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| {
            let value = ancestor.value();
            matches!(value.name(), "nav" | "header" | "footer" | "aside")
                || matches!(value.attr("role"), Some("navigation") | Some("banner"))
        })
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Field rules ============

    #[test]
    fn test_volume_rules_strict_first() {
        assert_eq!(
            first_match(&VOLUME_RULES, "Election Reform 20K+ searches"),
            Some("20K+".to_string())
        );
        assert_eq!(
            first_match(&VOLUME_RULES, "spiked to 2M+ overnight"),
            Some("2M+".to_string())
        );
        assert_eq!(
            first_match(&VOLUME_RULES, "500+ mentions"),
            Some("500+".to_string())
        );
    }

    #[test]
    fn test_volume_rules_exclude_bare_years() {
        assert_eq!(first_match(&VOLUME_RULES, "2025 searches"), None);
        assert_eq!(first_match(&VOLUME_RULES, "2025"), None);
        // A year with a magnitude suffix is a volume, not a date.
        assert_eq!(
            first_match(&VOLUME_RULES, "2025K+ searches"),
            Some("2025K+".to_string())
        );
    }

    #[test]
    fn test_volume_skips_year_then_finds_real_token() {
        assert_eq!(
            first_match(&VOLUME_RULES, "since 2025+ grew to 50K+"),
            Some("50K+".to_string())
        );
    }

    #[test]
    fn test_started_rules() {
        assert_eq!(
            first_match(&STARTED_RULES, "Started 4 hours ago"),
            Some("4 hours ago".to_string())
        );
        assert_eq!(
            first_match(&STARTED_RULES, "surfaced yesterday evening"),
            Some("yesterday".to_string())
        );
        assert_eq!(
            first_match(&STARTED_RULES, "active · 6h"),
            Some("6h".to_string())
        );
        assert_eq!(first_match(&STARTED_RULES, "no timing info"), None);
    }

    #[test]
    fn test_percent_rules_prefer_grouped() {
        assert_eq!(
            first_match(&PERCENT_RULES, "growth 12,000% today"),
            Some("12,000%".to_string())
        );
        assert_eq!(
            first_match(&PERCENT_RULES, "up 250"),
            Some("250%".to_string())
        );
    }

    #[test]
    fn test_percent_rules_reject_all_zero() {
        assert_eq!(first_match(&PERCENT_RULES, "padding 000%"), None);
        assert_eq!(first_match(&PERCENT_RULES, "0000 %"), None);
        // A zero match must not mask a later real one.
        assert_eq!(
            first_match(&PERCENT_RULES, "000% then 150%"),
            Some("150%".to_string())
        );
    }

    #[test]
    fn test_breakdown_rules() {
        assert_eq!(
            first_match(&BREAKDOWN_RULES, "Trend breakdown: ballot recount rules"),
            Some("ballot recount rules".to_string())
        );
        assert_eq!(first_match(&BREAKDOWN_RULES, "nothing here"), None);
    }

    // ============ Title extraction ============

    #[test]
    fn test_title_is_longest_run_before_first_number() {
        assert_eq!(
            title_before_first_number("Election Reform 20K+ 4 hours ago"),
            Some("Election Reform".to_string())
        );
        // The run after the dot is longer; the number still bounds it.
        assert_eq!(
            title_before_first_number("Hot · Supreme Court Ruling 50K+"),
            Some("Supreme Court Ruling".to_string())
        );
        assert_eq!(title_before_first_number("20K+ searches"), None);
    }

    // ============ Strategies & cascade ============

    #[test]
    fn test_structured_rows_require_three_cells_and_volume() {
        let html = r#"
            <table>
              <tr><td>Election Reform</td><td>20K+ searches</td><td>4 hours ago</td></tr>
              <tr><td>Too Few</td><td>10K+</td></tr>
              <tr><td>No Volume Here</td><td>some text</td><td>more text</td></tr>
            </table>"#;
        let document = Html::parse_document(html);
        let rows = extract_structured_rows(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Election Reform");
        assert_eq!(rows[0].search_volume.as_deref(), Some("20K+"));
        assert_eq!(rows[0].started.as_deref(), Some("4 hours ago"));
    }

    #[test]
    fn test_bare_year_row_is_not_volume() {
        let html = r#"
            <table>
              <tr><td>Budget Vote</td><td>2025</td><td>schedule</td></tr>
            </table>"#;
        let document = Html::parse_document(html);
        assert!(extract_structured_rows(&document).is_empty());
    }

    #[test]
    fn test_article_blocks_need_heading_and_link() {
        let html = r#"
            <article><h2>Ballot Recount</h2><a href="/story/1">read</a>
              <p>20K+ searches in the last day</p></article>
            <article><h2>No Link Here</h2><p>text</p></article>"#;
        let document = Html::parse_document(html);
        let blocks = extract_article_blocks(&document);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Ballot Recount");
        assert_eq!(blocks[0].search_volume.as_deref(), Some("20K+"));
        assert_eq!(blocks[0].source_link.as_deref(), Some("/story/1"));
    }

    #[test]
    fn test_link_harvest_skips_chrome_regions() {
        let html = r#"
            <nav><a href="/trends/explore?q=ignored">Ignored</a></nav>
            <main>
              <a href="/trends/explore?q=kept">Ballot Recount</a>
              <a href="/about">About</a>
            </main>"#;
        let document = Html::parse_document(html);
        let links = extract_link_harvest(&document);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Ballot Recount");
    }

    #[test]
    fn test_cascade_stops_at_first_validated_strategy() {
        // Rows present: later strategies must not contribute.
        let html = r#"
            <table>
              <tr><td>Election Reform</td><td>20K+ searches</td><td>4 hours ago</td></tr>
            </table>
            <h2>Heading Fallback Topic</h2>"#;
        let outcome = run_cascade(html);
        assert_eq!(outcome.topics.len(), 1);
        assert_eq!(outcome.topics[0].title, "Election Reform");
    }

    #[test]
    fn test_cascade_falls_through_to_headings() {
        let html = "<div><h2>Ballot Recount</h2><h3>School Levy</h3></div>";
        let outcome = run_cascade(html);
        let titles: Vec<&str> = outcome.topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Ballot Recount", "School Levy"]);
        assert!(outcome.topics.iter().all(|t| t.has_no_signal()));
    }

    #[test]
    fn test_cascade_empty_page_is_empty_not_error() {
        let outcome = run_cascade("<html><body><p>nothing to see</p></body></html>");
        assert!(outcome.topics.is_empty());
        assert_eq!(outcome.raw_seen, 0);
    }

    #[test]
    fn test_cascade_reports_raw_seen_when_all_rejected() {
        // Rows qualify structurally but every title is UI noise, and
        // no later strategy finds anything.
        let html = r#"
            <table>
              <tr><td>Sort By</td><td>20K+ searches</td><td>4 hours ago</td></tr>
            </table>"#;
        let outcome = run_cascade(html);
        assert!(outcome.topics.is_empty());
        assert!(outcome.raw_seen > 0);
    }
}
