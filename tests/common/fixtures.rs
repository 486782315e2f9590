//! Test fixture creation for catalog dumps

use super::constants::*;
use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn write_dump_file(root: &Path, kind: &str, name: &str, value: &serde_json::Value) -> Result<()> {
    fs::write(root.join(kind).join(name), serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Creates a temporary dump dir with 3 artists, 3 albums and 5 tracks,
/// one artist and one album being malformed.
pub fn create_test_dump() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let root = dir.path();
    for sub in ["artists", "albums", "tracks"] {
        fs::create_dir_all(root.join(sub))?;
    }

    write_dump_file(
        root,
        "artists",
        "artist_1.json",
        &json!({
            "id": ARTIST_1_ID,
            "name": "The Test Band",
            "followers": { "href": null, "total": 1200 },
            "genres": ["rock"],
            "type": "artist"
        }),
    )?;
    write_dump_file(
        root,
        "artists",
        "page_1.json",
        &json!({
            "href": "https://api.example.com/v1/artists?offset=0",
            "items": [
                { "id": ARTIST_2_ID, "name": "Jazz Ensemble", "followers": { "total": 0 } },
                { "id": ARTIST_BROKEN_ID, "name": "No Followers" }
            ],
            "next": null
        }),
    )?;

    write_dump_file(
        root,
        "albums",
        "page_1.json",
        &json!({
            "items": [
                { "id": ALBUM_1_ID, "name": "First Album", "release_date": "2019-05-17", "release_date_precision": "day" },
                { "id": ALBUM_2_ID, "name": "Old Recording", "release_date": "1958", "release_date_precision": "year" },
                { "id": ALBUM_BROKEN_ID, "name": "Regional Date", "release_date": "17/05/2019" }
            ]
        }),
    )?;

    let tracks: Vec<serde_json::Value> = TRACK_IDS
        .iter()
        .map(|id| json!({ "id": id, "name": format!("Track {}", id), "duration_ms": 180000 }))
        .collect();
    write_dump_file(root, "tracks", "page_1.json", &json!({ "items": tracks }))?;

    Ok(dir)
}
