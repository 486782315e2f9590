use super::{require, NormalizeError};
use crate::catalog::SourceAlbum;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // YYYY, YYYY-MM or YYYY-MM-DD
    static ref RELEASE_DATE_REGEX: Regex = Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$")
        .expect("Invalid Regex, this should be fixed at compile time.");
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AlbumRecord {
    #[serde(rename = "AlbumID")]
    pub album_id: String,
    #[serde(rename = "AlbumName")]
    pub album_name: String,
    #[serde(rename = "ReleaseDate")]
    pub release_date: String,
}

/// Checks that `raw` is an ISO-8601 calendar date, possibly with reduced
/// precision, and that it names a real day/month.
pub fn validate_release_date(raw: &str) -> Result<(), NormalizeError> {
    let malformed = || NormalizeError::MalformedDate(raw.to_owned());
    let captures = RELEASE_DATE_REGEX.captures(raw).ok_or_else(malformed)?;

    let year: i32 = captures[1].parse().map_err(|_| malformed())?;
    let month: u32 = match captures.get(2) {
        Some(m) => m.as_str().parse().map_err(|_| malformed())?,
        None => 1,
    };
    let day: u32 = match captures.get(3) {
        Some(d) => d.as_str().parse().map_err(|_| malformed())?,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|_| ())
        .ok_or_else(malformed)
}

pub fn transform_album(record: &SourceAlbum) -> Result<AlbumRecord, NormalizeError> {
    let album_id = require(record.id.as_ref(), "id")?;
    let album_name = require(record.name.as_ref(), "name")?;
    let release_date = require(record.release_date.as_ref(), "release_date")?;
    validate_release_date(release_date)?;

    Ok(AlbumRecord {
        album_id: album_id.clone(),
        album_name: album_name.clone(),
        release_date: release_date.clone(),
    })
}

pub fn transform_album_value(value: &serde_json::Value) -> Result<AlbumRecord, NormalizeError> {
    let record = SourceAlbum::deserialize(value)?;
    transform_album(&record)
}
