//! One ETL run: normalize a catalog dump, simulate the week's engagement
//! and hand everything to a sink.

use crate::catalog::CatalogDump;
use crate::engagement::{EngagementModel, WeeklyEngagementBatch};
use crate::normalize::{track_id_value, transform_album_value, transform_artist_value, NormalizeError};
use crate::sink::{RecordSink, WrittenRows};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub week_start: NaiveDate,
    /// Fail on the first malformed record instead of skipping it.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub artists: usize,
    pub albums: usize,
    pub engagement_records: usize,
    pub skipped_artists: usize,
    pub skipped_albums: usize,
    pub skipped_tracks: usize,
    /// What the sink stored, `None` on dry runs.
    pub written: Option<WrittenRows>,
}

impl RunSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_artists + self.skipped_albums + self.skipped_tracks
    }
}

/// Applies `transform` to every item. Strict mode stops at the first error,
/// otherwise failing items are logged and counted.
fn normalize_all<T, U, F>(items: &[T], kind: &str, strict: bool, transform: F) -> Result<(Vec<U>, usize)>
where
    F: Fn(&T) -> Result<U, NormalizeError>,
{
    let mut out = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match transform(item) {
            Ok(row) => out.push(row),
            Err(err) if strict => {
                return Err(err).with_context(|| format!("Could not normalize {} #{}", kind, index));
            }
            Err(err) => {
                warn!("Skipping {} #{}: {}", kind, index, err);
                skipped += 1;
            }
        }
    }
    Ok((out, skipped))
}

pub fn run_pipeline<R: Rng + ?Sized>(
    dump: &CatalogDump,
    model: &EngagementModel,
    sink: Option<&dyn RecordSink>,
    options: &PipelineOptions,
    rng: &mut R,
) -> Result<RunSummary> {
    let (artists, skipped_artists) =
        normalize_all(&dump.artists, "artist", options.strict, transform_artist_value)?;
    let (albums, skipped_albums) =
        normalize_all(&dump.albums, "album", options.strict, transform_album_value)?;
    let (song_ids, skipped_tracks) =
        normalize_all(&dump.tracks, "track", options.strict, track_id_value)?;

    info!(
        "Normalized {} artists, {} albums, {} tracks",
        artists.len(),
        albums.len(),
        song_ids.len()
    );

    let batch: WeeklyEngagementBatch = model.generate_batch(options.week_start, &song_ids, rng);
    info!(
        "Generated {} engagement records for week starting {}",
        batch.records.len(),
        batch.week_start
    );

    let mut summary = RunSummary {
        artists: artists.len(),
        albums: albums.len(),
        engagement_records: batch.records.len(),
        skipped_artists,
        skipped_albums,
        skipped_tracks,
        written: None,
    };

    match sink {
        Some(sink) => {
            let written = sink
                .write_run(&artists, &albums, &batch)
                .context("Failed to write run")?;
            if written.engagement < batch.records.len() {
                warn!(
                    "{} engagement records stored for {} generated",
                    written.engagement,
                    batch.records.len()
                );
            }
            summary.written = Some(written);
        }
        None => info!("Dry run, nothing written."),
    }

    if summary.skipped() > 0 {
        warn!("Skipped {} malformed records", summary.skipped());
    }
    Ok(summary)
}
