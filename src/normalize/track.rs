use super::{require, NormalizeError};
use crate::catalog::SourceTrack;
use serde::Deserialize;

pub fn track_id(track: &SourceTrack) -> Result<String, NormalizeError> {
    require(track.id.as_ref(), "id").cloned()
}

pub fn track_id_value(value: &serde_json::Value) -> Result<String, NormalizeError> {
    let track = SourceTrack::deserialize(value)?;
    track_id(&track)
}

/// Content identifiers of the given tracks, in order.
pub fn track_ids(tracks: &[SourceTrack]) -> Result<Vec<String>, NormalizeError> {
    tracks.iter().map(track_id).collect()
}
