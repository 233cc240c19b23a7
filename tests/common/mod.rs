use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use async_trait::async_trait;

use trendmap::region::Region;
use trendmap::source::ContentSource;

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn load_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", relative))
}

/// In-memory content source: regions without a page fail their fetch,
/// which the batch must treat as SourceUnavailable.
pub struct FixtureSource {
    pages: HashMap<&'static str, String>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, code: &'static str, html: impl Into<String>) -> Self {
        self.pages.insert(code, html.into());
        self
    }
}

#[async_trait]
impl ContentSource for FixtureSource {
    async fn fetch(&self, region: &Region) -> Result<String> {
        match self.pages.get(region.code) {
            Some(html) => Ok(html.clone()),
            None => bail!("no content for {}", region.code),
        }
    }
}
