//! Pipeline entry points for ingestion.
//!
//! - `Ingestor::run`: walk routes, directions, and stops, then save
//! - `Ingestor::load_all`: the same on a background task, events over a channel
//! - `run_ingest`: build everything from a `Config` and run once

mod dedup;
mod ingest;
mod progress;
mod run;

pub use dedup::FirstSeen;
pub use ingest::{IngestHandle, Ingestor, RunReport, RunStatus};
pub use progress::{ChannelSink, LogSink, NullSink, ProgressSink};
pub use run::{build_ingestor, run_ingest};
