//! Core data model for extracted and scored trending topics.
//!
//! A `RawCandidate` is what one extraction strategy produces before any
//! filtering. A `ScoredTopic` is a validated candidate plus its
//! relevance score and classification. `StateRecord` / `AggregateStore`
//! are the persisted shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unvalidated topic record produced by a single extraction strategy.
/// Fields the strategy could not resolve are `None`; candidates may
/// still contain UI noise until the validator has seen them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCandidate {
    pub title: String,
    pub search_volume: Option<String>,
    pub started: Option<String>,
    pub breakdown: Option<String>,
    pub percentage: Option<String>,
    pub source_link: Option<String>,
}

impl RawCandidate {
    /// A candidate carrying only a title, as produced by the link and
    /// heading strategies.
    pub fn bare(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// True if neither search volume nor started text was resolved.
    pub fn has_no_signal(&self) -> bool {
        self.search_volume.is_none() && self.started.is_none()
    }
}

/// A validated topic with its relevance score and classification,
/// serialized in the shape consumed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTopic {
    pub name: String,
    /// Always in 0..=100.
    pub relevance_score: u8,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_breakdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_increase: Option<String>,
    /// Signed leaning in -100..=100; absent for non-political topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_leaning: Option<i32>,
}

/// One region's topic set for a single ingestion run. Created or
/// overwritten per run by the aggregator; read-only downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub name: String,
    pub code: String,
    pub top_topic: String,
    pub category: String,
    pub trending_score: u8,
    pub topics: Vec<ScoredTopic>,
    pub timestamp: DateTime<Utc>,
}

/// The durable mapping from region to its latest record, persisted as a
/// single JSON file and merge-updated per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStore {
    pub timestamp: DateTime<Utc>,
    pub states: Vec<StateRecord>,
}

impl AggregateStore {
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            states: Vec::new(),
        }
    }
}
