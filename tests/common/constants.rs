//! Shared constants for end-to-end tests

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Artist ID for "The Test Band"
pub const ARTIST_1_ID: &str = "artist-1";

/// Artist ID for "Jazz Ensemble"
pub const ARTIST_2_ID: &str = "artist-2";

/// Artist without followers, skipped in lenient runs
pub const ARTIST_BROKEN_ID: &str = "artist-broken";

pub const ALBUM_1_ID: &str = "album-1";

pub const ALBUM_2_ID: &str = "album-2";

/// Album with a regional release date, skipped in lenient runs
pub const ALBUM_BROKEN_ID: &str = "album-broken";

/// Tracks of the test dump, in dump order
pub const TRACK_IDS: &[&str] = &["track-1", "track-2", "track-3", "track-4", "track-5"];

// ============================================================================
// Runs
// ============================================================================

/// A Monday
pub const WEEK_START: &str = "2024-03-04";

pub const SEED: u64 = 20240304;
