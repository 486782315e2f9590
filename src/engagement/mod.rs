//! Synthetic weekly engagement numbers for catalog tracks.

mod simulator;

pub use simulator::{
    generate_weekly_data, week_start_of, EngagementError, EngagementModel, EngagementParams,
    WeeklyEngagementBatch, WeeklyEngagementRecord,
};
