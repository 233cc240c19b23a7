//! Aggregation and persistence of per-region results.
//!
//! `build_state_record` ranks one region's topics; `merge_store` is the
//! pure merge against the previous store (regions absent from a run
//! keep their prior entry). Loading tolerates a corrupt file by falling
//! back to an empty store; saving is atomic (temp file + fsync +
//! rename) so an interrupted run never truncates the dataset.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::region::Region;
use crate::topic::{AggregateStore, ScoredTopic, StateRecord};

const STORE_TMP_SUFFIX: &str = ".tmp";

/// Rank, dedupe, and truncate one region's topics into a StateRecord.
///
/// Topics under the score floor are dropped. Duplicate titles collapse
/// to one entry; the sort happens before the first-occurrence-wins
/// dedupe, so the higher-scored duplicate survives (equal scores keep
/// input order — the sort is stable).
pub fn build_state_record(
    region: &Region,
    topics: Vec<ScoredTopic>,
    top_n: usize,
    score_floor: u8,
    timestamp: DateTime<Utc>,
) -> StateRecord {
    let mut topics: Vec<ScoredTopic> = topics
        .into_iter()
        .filter(|topic| topic.relevance_score >= score_floor)
        .collect();
    topics.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    let mut seen = HashSet::new();
    topics.retain(|topic| seen.insert(topic.name.clone()));
    topics.truncate(top_n);

    let (top_topic, category, trending_score) = match topics.first() {
        Some(top) => (top.name.clone(), top.category.clone(), top.relevance_score),
        None => (String::new(), String::new(), 0),
    };

    StateRecord {
        name: region.name.to_string(),
        code: region.code.to_string(),
        top_topic,
        category,
        trending_score,
        topics,
        timestamp,
    }
}

/// Merge the current run's records into the previous store.
///
/// Keyed by region name: keys present in the current run are
/// overwritten, all other previous entries are retained unchanged.
/// Output is sorted by region name so the persisted file is
/// deterministic across runs.
pub fn merge_store(
    previous: AggregateStore,
    current: Vec<StateRecord>,
    run_started: DateTime<Utc>,
) -> AggregateStore {
    let mut states = previous.states;
    for record in current {
        match states.iter_mut().find(|existing| existing.name == record.name) {
            Some(existing) => *existing = record,
            None => states.push(record),
        }
    }
    states.sort_by(|a, b| a.name.cmp(&b.name));
    AggregateStore {
        timestamp: run_started,
        states,
    }
}

/// Load the persisted store. A missing file is a normal first run; an
/// unreadable or corrupt file is downgraded to an empty store so a bad
/// write never blocks future ingestion.
pub fn load_store(path: &Path, now: DateTime<Utc>) -> AggregateStore {
    if !path.exists() {
        return AggregateStore::empty(now);
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable aggregate store, starting empty");
            return AggregateStore::empty(now);
        }
    };
    match serde_json::from_str(&content) {
        Ok(store) => store,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt aggregate store, starting empty");
            AggregateStore::empty(now)
        }
    }
}

/// Atomically persist the store: write to a temp file, fsync, rename.
pub fn save_store(path: &Path, store: &AggregateStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
        }
    }

    let content = serde_json::to_string_pretty(store).context("Failed to serialize store")?;
    let tmp_path = path.with_extension(format!(
        "{}{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
        STORE_TMP_SUFFIX
    ));

    {
        let mut file = std::fs::File::create(&tmp_path)
            .with_context(|| format!("Failed to create temp store file: {}", tmp_path.display()))?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move store into place: {}", path.display()))?;

    Ok(())
}
