mod file_config;

pub use file_config::{EngagementConfig, FileConfig};

use crate::engagement::{week_start_of, EngagementModel, EngagementParams};
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dump_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub week: Option<NaiveDate>,
    pub strict: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dump_dir: PathBuf,
    /// `None` on dry runs, nothing is written.
    pub db_path: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Monday of the week the engagement numbers are generated for.
    pub week_start: NaiveDate,
    pub strict: bool,
    pub engagement: EngagementParams,
}

fn parse_week(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid week date {:?}, expected YYYY-MM-DD", s))
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present. `today` picks the week
    /// when neither source names one.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>, today: NaiveDate) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dump_dir = file
            .dump_dir
            .map(PathBuf::from)
            .or_else(|| cli.dump_dir.clone())
            .ok_or_else(|| {
                anyhow!("dump_dir must be specified on the command line or in config file")
            })?;
        if !dump_dir.is_dir() {
            bail!("Dump directory does not exist: {:?}", dump_dir);
        }

        let db_path = if cli.dry_run {
            None
        } else {
            let db_path = file
                .db_path
                .map(PathBuf::from)
                .or_else(|| cli.db_path.clone())
                .ok_or_else(|| {
                    anyhow!("db_path must be specified on the command line or in config file")
                })?;
            Some(db_path)
        };

        let seed = file.seed.or(cli.seed);

        let week = match file.week {
            Some(s) => parse_week(&s)?,
            None => cli.week.unwrap_or(today),
        };
        let week_start = week_start_of(week);

        let strict = file.strict.unwrap_or(cli.strict);

        // Engagement settings - merge file config with defaults
        let defaults = EngagementParams::default();
        let engagement_file = file.engagement.unwrap_or_default();
        let engagement = EngagementParams {
            downloads_mean: engagement_file
                .downloads_mean
                .unwrap_or(defaults.downloads_mean),
            downloads_std_dev: engagement_file
                .downloads_std_dev
                .unwrap_or(defaults.downloads_std_dev),
            streams_mean: engagement_file.streams_mean.unwrap_or(defaults.streams_mean),
            streams_std_dev: engagement_file
                .streams_std_dev
                .unwrap_or(defaults.streams_std_dev),
        };
        EngagementModel::new(engagement).context("Invalid [engagement] configuration")?;

        Ok(AppConfig {
            dump_dir,
            db_path,
            seed,
            week_start,
            strict,
            engagement,
        })
    }
}
