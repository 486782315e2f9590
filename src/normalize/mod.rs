//! Flattening of nested catalog records into flat rows.

mod album;
mod artist;
mod error;
mod track;

pub use album::{transform_album, transform_album_value, validate_release_date, AlbumRecord};
pub use artist::{transform_artist, transform_artist_value, ArtistRecord};
pub use error::NormalizeError;
pub use track::{track_id, track_id_value, track_ids};

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, NormalizeError> {
    value.ok_or(NormalizeError::MissingField(field))
}
