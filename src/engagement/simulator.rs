use chrono::{Datelike, Days, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DOWNLOADS_MEAN: f64 = 50_000.0;
pub const DEFAULT_DOWNLOADS_STD_DEV: f64 = 15_000.0;
pub const DEFAULT_STREAMS_MEAN: f64 = 600_000.0;
pub const DEFAULT_STREAMS_STD_DEV: f64 = 200_000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngagementError {
    #[error("Invalid {which} distribution: mean {mean}, std dev {std_dev}")]
    InvalidParams {
        which: &'static str,
        mean: f64,
        std_dev: f64,
    },
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct WeeklyEngagementRecord {
    pub song_id: String,
    pub total_weekly_downloads: u64,
    pub total_weekly_streams: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyEngagementBatch {
    pub week_start: NaiveDate,
    pub records: Vec<WeeklyEngagementRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngagementParams {
    pub downloads_mean: f64,
    pub downloads_std_dev: f64,
    pub streams_mean: f64,
    pub streams_std_dev: f64,
}

impl Default for EngagementParams {
    fn default() -> Self {
        EngagementParams {
            downloads_mean: DEFAULT_DOWNLOADS_MEAN,
            downloads_std_dev: DEFAULT_DOWNLOADS_STD_DEV,
            streams_mean: DEFAULT_STREAMS_MEAN,
            streams_std_dev: DEFAULT_STREAMS_STD_DEV,
        }
    }
}

fn normal(which: &'static str, mean: f64, std_dev: f64) -> Result<Normal<f64>, EngagementError> {
    let invalid = EngagementError::InvalidParams {
        which,
        mean,
        std_dev,
    };
    if !mean.is_finite() {
        return Err(invalid);
    }
    Normal::new(mean, std_dev).map_err(|_| invalid)
}

/// Truncates towards zero, then clamps negatives to 0.
fn draw_count<R: Rng + ?Sized>(distribution: &Normal<f64>, rng: &mut R) -> u64 {
    let truncated = distribution.sample(rng) as i64;
    truncated.max(0) as u64
}

/// Weekly downloads/streams generator.
///
/// Holds only the two distributions, the random source is passed to every
/// call so that seeded runs are reproducible.
#[derive(Clone, Debug)]
pub struct EngagementModel {
    downloads: Normal<f64>,
    streams: Normal<f64>,
}

impl EngagementModel {
    pub fn new(params: EngagementParams) -> Result<Self, EngagementError> {
        Ok(EngagementModel {
            downloads: normal("downloads", params.downloads_mean, params.downloads_std_dev)?,
            streams: normal("streams", params.streams_mean, params.streams_std_dev)?,
        })
    }

    pub fn generate<S, R>(&self, song_ids: &[S], rng: &mut R) -> Vec<WeeklyEngagementRecord>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        song_ids
            .iter()
            .map(|song_id| WeeklyEngagementRecord {
                song_id: song_id.as_ref().to_owned(),
                total_weekly_downloads: draw_count(&self.downloads, rng),
                total_weekly_streams: draw_count(&self.streams, rng),
            })
            .collect()
    }

    pub fn generate_batch<S, R>(
        &self,
        week_start: NaiveDate,
        song_ids: &[S],
        rng: &mut R,
    ) -> WeeklyEngagementBatch
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        WeeklyEngagementBatch {
            week_start,
            records: self.generate(song_ids, rng),
        }
    }
}

impl Default for EngagementModel {
    fn default() -> Self {
        EngagementModel::new(EngagementParams::default())
            .expect("Default engagement parameters must be valid.")
    }
}

/// One record per song id, in input order, using the default distributions.
pub fn generate_weekly_data<S, R>(song_ids: &[S], rng: &mut R) -> Vec<WeeklyEngagementRecord>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    EngagementModel::default().generate(song_ids, rng)
}

/// Monday of the week `date` falls in.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}
