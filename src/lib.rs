//! Catalog ETL Library
//!
//! Flattens already-fetched music catalog metadata, simulates weekly
//! engagement numbers for its tracks and loads both into a record sink.

pub mod catalog;
pub mod config;
pub mod engagement;
pub mod normalize;
pub mod pipeline;
pub mod sink;

// Re-export commonly used types for convenience
pub use engagement::{generate_weekly_data, EngagementModel, WeeklyEngagementRecord};
pub use normalize::{transform_album, transform_artist, AlbumRecord, ArtistRecord, NormalizeError};
pub use pipeline::{run_pipeline, PipelineOptions, RunSummary};
pub use sink::{RecordSink, SqliteRecordSink, WrittenRows};
