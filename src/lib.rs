// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod leaning;
pub mod lexicon;
pub mod region;
pub mod score;
pub mod source;
pub mod topic;
pub mod validate;

pub use ingest::{RegionStatus, RunSummary};
pub use topic::{AggregateStore, RawCandidate, ScoredTopic, StateRecord};
