use anyhow::{Context, Result};
use catalog_etl::catalog::load_dump;
use catalog_etl::config::{AppConfig, CliConfig, FileConfig};
use catalog_etl::{run_pipeline, EngagementModel, PipelineOptions, RecordSink, SqliteRecordSink};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {}", s))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory with the catalog API dump (artists/, albums/, tracks/).
    #[clap(value_parser = parse_path)]
    pub dump_dir: Option<PathBuf>,

    /// Path to the SQLite database the records are loaded into.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file, its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Seed for the engagement simulator, random if not given.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Any day of the week to generate engagement numbers for (YYYY-MM-DD).
    /// Defaults to the current week.
    #[clap(long, value_parser = parse_date)]
    pub week: Option<NaiveDate>,

    /// Fail on the first malformed record or dump file instead of skipping it.
    #[clap(long)]
    pub strict: bool,

    /// Run everything but do not write to the database.
    #[clap(long)]
    pub dry_run: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            dump_dir: self.dump_dir.clone(),
            db_path: self.db_path.clone(),
            seed: self.seed,
            week: self.week,
            strict: self.strict,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(
        &cli_args.to_cli_config(),
        file_config,
        Local::now().date_naive(),
    )?;

    let dump = load_dump(&config.dump_dir, config.strict)?;
    let model = EngagementModel::new(config.engagement)?;

    let mut rng = match config.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let sink = match &config.db_path {
        Some(db_path) => Some(SqliteRecordSink::new(db_path)?),
        None => None,
    };

    let options = PipelineOptions {
        week_start: config.week_start,
        strict: config.strict,
    };
    let summary = run_pipeline(
        &dump,
        &model,
        sink.as_ref().map(|s| s as &dyn RecordSink),
        &options,
        &mut rng,
    )?;

    info!(
        "Done: {} artists, {} albums, {} engagement records for week {} ({} skipped{})",
        summary.artists,
        summary.albums,
        summary.engagement_records,
        config.week_start,
        summary.skipped(),
        if summary.written.is_some() { "" } else { ", dry run" }
    );
    Ok(())
}
