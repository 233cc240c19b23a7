//! Immutable keyword lexicons backing the classifier and the feed
//! scorer.
//!
//! These are configuration data, not logic: loaded once, never mutated.
//! Entries are curated to avoid overlapping substrings within a list
//! (e.g. "democrat" covers "democrats" via substring matching, so the
//! plural is not listed separately). The classifier itself does not
//! enforce non-overlap.

/// One non-political category and the phrases that place a title in it.
#[derive(Debug, Clone, Copy)]
pub struct NonPoliticalCategory<'a> {
    pub category: &'a str,
    pub phrases: &'a [&'a str],
}

/// The three political keyword lists plus the non-political early-exit
/// list, bundled so tests can substitute fixture lexicons.
#[derive(Debug, Clone, Copy)]
pub struct LeaningLexicons<'a> {
    pub left: &'a [&'a str],
    pub right: &'a [&'a str],
    pub centrist: &'a [&'a str],
    pub non_political: &'a [NonPoliticalCategory<'a>],
}

pub const LEFT_KEYWORDS: &[&str] = &[
    "medicare for all",
    "green new deal",
    "climate change",
    "climate action",
    "bernie sanders",
    "elizabeth warren",
    "alexandria ocasio-cortez",
    "universal healthcare",
    "single payer",
    "gun control",
    "abortion rights",
    "reproductive rights",
    "voting rights",
    "minimum wage",
    "student loan forgiveness",
    "labor union",
    "social justice",
    "racial justice",
    "police reform",
    "planned parenthood",
    "renewable energy",
    "wealth tax",
    "public option",
    "affordable housing",
    "paid family leave",
    "lgbtq rights",
    "progressive",
    "democrat",
    "biden",
    "kamala harris",
    "obamacare",
];

pub const RIGHT_KEYWORDS: &[&str] = &[
    "border wall",
    "build the wall",
    "border security",
    "second amendment",
    "gun rights",
    "pro life",
    "pro-life",
    "tax cuts",
    "school choice",
    "election integrity",
    "america first",
    "illegal immigration",
    "religious freedom",
    "small government",
    "deregulation",
    "back the blue",
    "parental rights",
    "voter id",
    "critical race theory",
    "energy independence",
    "maga",
    "trump",
    "ron desantis",
    "republican",
    "conservative",
];

pub const CENTRIST_KEYWORDS: &[&str] = &[
    "bipartisan",
    "compromise",
    "moderate",
    "congress",
    "senate",
    "house of representatives",
    "supreme court",
    "governor",
    "legislation",
    "ballot measure",
    "town hall",
    "capitol hill",
    "white house",
    "federal budget",
    "infrastructure",
    "midterm",
    "primary election",
    "state legislature",
    "city council",
];

/// Non-political phrases, grouped by the category assigned to matching
/// topics. A match here short-circuits classification entirely.
pub const NON_POLITICAL: &[NonPoliticalCategory<'static>] = &[
    NonPoliticalCategory {
        category: "Weather",
        phrases: &[
            "weather",
            "forecast",
            "hurricane",
            "tornado",
            "blizzard",
            "heat wave",
            "snowstorm",
            "flood warning",
        ],
    },
    NonPoliticalCategory {
        category: "Sports",
        phrases: &[
            "nfl",
            "nba",
            "mlb",
            "nhl",
            "super bowl",
            "playoffs",
            "touchdown",
            "world cup",
            "olympics",
            "march madness",
            "home run",
            "quarterback",
        ],
    },
    NonPoliticalCategory {
        category: "Entertainment",
        phrases: &[
            "movie",
            "trailer",
            "box office",
            "album",
            "concert",
            "netflix",
            "tv show",
            "celebrity",
            "red carpet",
            "grammy",
            "oscars",
            "premiere",
        ],
    },
    NonPoliticalCategory {
        category: "Health",
        phrases: &[
            "recipe",
            "workout",
            "fitness",
            "diet plan",
            "flu season",
            "skincare",
        ],
    },
    NonPoliticalCategory {
        category: "Science",
        phrases: &[
            "nasa",
            "spacex",
            "eclipse",
            "asteroid",
            "telescope",
            "rocket launch",
        ],
    },
    NonPoliticalCategory {
        category: "Technology",
        phrases: &[
            "iphone",
            "android",
            "playstation",
            "xbox",
            "nintendo",
            "video game",
        ],
    },
];

/// Production lexicons used by `leaning::classify_political_leaning`.
pub const DEFAULT_LEXICONS: LeaningLexicons<'static> = LeaningLexicons {
    left: LEFT_KEYWORDS,
    right: RIGHT_KEYWORDS,
    centrist: CENTRIST_KEYWORDS,
    non_political: NON_POLITICAL,
};

/// Topical lexicon for the feed scorer's keyword-density component.
pub const TOPICAL_KEYWORDS: &[&str] = &[
    "election",
    "congress",
    "senate",
    "governor",
    "legislation",
    "policy",
    "campaign",
    "vote",
    "president",
    "court",
    "protest",
    "economy",
    "inflation",
    "immigration",
    "healthcare",
    "education",
];
