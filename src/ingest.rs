//! Bounded-concurrency batch ingestion.
//!
//! Regions are processed under a semaphore-limited task pool with a
//! mandatory delay between fetch starts and a hard per-region timeout.
//! Failures are isolated: a region that times out, errors, or yields
//! nothing is recorded in the run summary and never aborts the batch.
//! The store write-back happens once, after the whole batch completes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::aggregate;
use crate::config::IngestConfig;
use crate::extract;
use crate::leaning;
use crate::region::Region;
use crate::score;
use crate::source::ContentSource;
use crate::topic::{RawCandidate, ScoredTopic, StateRecord};

/// How a single region fared in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionStatus {
    /// Validated topics were extracted.
    Ok,
    /// Fetch failed or exceeded the region timeout. Not retried this
    /// run; the region keeps its previous store entry.
    SourceUnavailable,
    /// Every cascade strategy returned zero candidates.
    ExtractionExhausted,
    /// Candidates were produced but none survived validation.
    ValidationRejectedAll,
}

/// Result of processing a single region in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct RegionOutcome {
    pub code: String,
    pub name: String,
    pub status: RegionStatus,
    pub topic_count: usize,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Operator-facing summary of a whole ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_regions: usize,
    pub succeeded: usize,
    /// Regions that produced no topics this run (extraction exhausted
    /// or everything rejected); they retain prior data on merge.
    pub empty: usize,
    pub failed: usize,
    pub outcomes: Vec<RegionOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_duration_secs: f64,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            total_regions: 0,
            succeeded: 0,
            empty: 0,
            failed: 0,
            outcomes: Vec::new(),
            started_at,
            completed_at: None,
            total_duration_secs: 0.0,
        }
    }

    /// Recompute counts from the recorded outcomes and stamp the end.
    pub fn finalize(&mut self, total_duration: Duration) {
        self.total_regions = self.outcomes.len();
        self.succeeded = self.count(RegionStatus::Ok);
        self.failed = self.count(RegionStatus::SourceUnavailable);
        self.empty = self.count(RegionStatus::ExtractionExhausted)
            + self.count(RegionStatus::ValidationRejectedAll);
        self.completed_at = Some(Utc::now());
        self.total_duration_secs = total_duration.as_secs_f64();
    }

    fn count(&self, status: RegionStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Score and classify validated candidates into output topics.
pub fn score_candidates(candidates: Vec<RawCandidate>) -> Vec<ScoredTopic> {
    candidates
        .into_iter()
        .map(|candidate| {
            let relevance_score = score::score_trend(
                candidate.search_volume.as_deref(),
                candidate.started.as_deref(),
                candidate.percentage.as_deref(),
            );
            let political_leaning = leaning::classify_political_leaning(&candidate.title);
            let category = leaning::topic_category(&candidate.title, political_leaning).to_string();
            ScoredTopic {
                name: candidate.title,
                relevance_score,
                category,
                search_volume: candidate.search_volume,
                started: candidate.started,
                trend_breakdown: candidate.breakdown,
                percentage_increase: candidate.percentage,
                political_leaning,
            }
        })
        .collect()
}

/// Process every region and return the run's StateRecords plus the
/// summary. Regions never share mutable state; the caller performs the
/// single serialized store merge afterwards.
pub async fn run_batch<S>(
    source: Arc<S>,
    regions: &[&'static Region],
    config: &IngestConfig,
    run_started: DateTime<Utc>,
) -> (Vec<StateRecord>, RunSummary)
where
    S: ContentSource + ?Sized + 'static,
{
    let batch_start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let region_timeout = Duration::from_millis(config.region_timeout_ms);
    let request_delay = Duration::from_millis(config.request_delay_ms);
    let progress = ProgressBar::new(regions.len() as u64);

    let futures = regions.iter().map(|region| {
        let region: &'static Region = *region;
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let progress = progress.clone();
        async move {
            let start = Instant::now();
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            if !request_delay.is_zero() {
                sleep(request_delay).await;
            }

            let result = process_region(source.as_ref(), region, region_timeout).await;
            progress.inc(1);
            (region, result, start.elapsed())
        }
    });

    let results = join_all(futures).await;
    progress.finish_and_clear();

    let mut records = Vec::new();
    let mut summary = RunSummary::new(run_started);
    for (region, result, elapsed) in results {
        let (status, topics, error) = result;
        let topic_count = topics.as_ref().map(Vec::len).unwrap_or(0);
        if let Some(topics) = topics {
            records.push(aggregate::build_state_record(
                region,
                topics,
                config.top_n,
                config.score_floor,
                run_started,
            ));
        }
        summary.outcomes.push(RegionOutcome {
            code: region.code.to_string(),
            name: region.name.to_string(),
            status,
            topic_count,
            duration_secs: elapsed.as_secs_f64(),
            error,
        });
    }
    summary.finalize(batch_start.elapsed());

    (records, summary)
}

type RegionResult = (RegionStatus, Option<Vec<ScoredTopic>>, Option<String>);

async fn process_region<S>(
    source: &S,
    region: &'static Region,
    region_timeout: Duration,
) -> RegionResult
where
    S: ContentSource + ?Sized,
{
    let html = match timeout(region_timeout, source.fetch(region)).await {
        Err(_) => {
            warn!(region = region.code, "fetch exceeded region timeout, recording no data");
            return (
                RegionStatus::SourceUnavailable,
                None,
                Some("region timeout exceeded".to_string()),
            );
        }
        Ok(Err(e)) => {
            warn!(region = region.code, error = %e, "fetch failed, recording no data");
            return (RegionStatus::SourceUnavailable, None, Some(e.to_string()));
        }
        Ok(Ok(html)) => html,
    };

    let cascade = extract::run_cascade(&html);
    if cascade.topics.is_empty() {
        let status = if cascade.raw_seen == 0 {
            debug!(region = region.code, "all extraction strategies exhausted");
            RegionStatus::ExtractionExhausted
        } else {
            debug!(
                region = region.code,
                raw_seen = cascade.raw_seen,
                "all extracted candidates rejected by validation"
            );
            RegionStatus::ValidationRejectedAll
        };
        return (status, None, None);
    }

    let topics = score_candidates(cascade.topics);
    debug!(region = region.code, count = topics.len(), "region extracted");
    (RegionStatus::Ok, Some(topics), None)
}
