//! SQLite-backed record sink.

use super::schema::{ALBUM_TABLE, ARTIST_TABLE, TABLES, WEEKLY_ENGAGEMENT_TABLE};
use super::{RecordSink, WrittenRows};
use crate::engagement::{WeeklyEngagementBatch, WeeklyEngagementRecord};
use crate::normalize::{AlbumRecord, ArtistRecord};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const WEEK_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteRecordSink {
    conn: Mutex<Connection>,
}

fn to_sql_count(value: u64) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("Count {} does not fit in SQLite", value))
}

fn from_sql_count(value: i64) -> Result<u64> {
    u64::try_from(value).with_context(|| format!("Negative count {} in database", value))
}

impl SqliteRecordSink {
    /// Opens the database at `db_path`, creating it and any missing table.
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        info!("Opened record database at {}", db_path.display());
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        for table in TABLES {
            table
                .create(&conn)
                .with_context(|| format!("Failed to create {} table", table.name))?;
            table.validate(&conn)?;
        }
        Ok(SqliteRecordSink {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Record database connection lock poisoned"))
    }

    pub fn count_rows(&self, table: &str) -> Result<usize> {
        if !TABLES.iter().any(|t| t.name == table) {
            return Err(anyhow!("Unknown table {}", table));
        }
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    pub fn get_artist(&self, artist_id: &str) -> Result<Option<ArtistRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT artist_id, name, followers FROM {} WHERE artist_id = ?1",
                    ARTIST_TABLE.name
                ),
                params![artist_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(artist_id, name, followers)| -> Result<ArtistRecord> {
            Ok(ArtistRecord {
                artist_id,
                name,
                followers: from_sql_count(followers)?,
            })
        })
        .transpose()
    }

    pub fn get_album(&self, album_id: &str) -> Result<Option<AlbumRecord>> {
        let conn = self.lock()?;
        let album = conn
            .query_row(
                &format!(
                    "SELECT album_id, album_name, release_date FROM {} WHERE album_id = ?1",
                    ALBUM_TABLE.name
                ),
                params![album_id],
                |row| {
                    Ok(AlbumRecord {
                        album_id: row.get(0)?,
                        album_name: row.get(1)?,
                        release_date: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(album)
    }

    /// Records of one week, ordered by song id.
    pub fn get_weekly_engagement(&self, week_start: NaiveDate) -> Result<Vec<WeeklyEngagementRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT song_id, total_weekly_downloads, total_weekly_streams FROM {} WHERE week_start = ?1 ORDER BY song_id",
            WEEKLY_ENGAGEMENT_TABLE.name
        ))?;
        let rows: Vec<(String, i64, i64)> = stmt
            .query_map(params![week_start.format(WEEK_FORMAT).to_string()], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(song_id, downloads, streams)| -> Result<WeeklyEngagementRecord> {
                Ok(WeeklyEngagementRecord {
                    song_id,
                    total_weekly_downloads: from_sql_count(downloads)?,
                    total_weekly_streams: from_sql_count(streams)?,
                })
            })
            .collect()
    }
}

fn insert_artists(conn: &Connection, artists: &[ArtistRecord]) -> Result<usize> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (artist_id, name, followers) VALUES (?1, ?2, ?3) \
         ON CONFLICT(artist_id) DO UPDATE SET name = excluded.name, followers = excluded.followers, \
         loaded = cast(strftime('%s','now') as int)",
        ARTIST_TABLE.name
    ))?;
    let mut keys = HashSet::new();
    for artist in artists {
        stmt.execute(params![
            artist.artist_id,
            artist.name,
            to_sql_count(artist.followers)?
        ])
        .with_context(|| format!("Failed to write artist {}", artist.artist_id))?;
        keys.insert(artist.artist_id.as_str());
    }
    Ok(keys.len())
}

fn insert_albums(conn: &Connection, albums: &[AlbumRecord]) -> Result<usize> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (album_id, album_name, release_date) VALUES (?1, ?2, ?3) \
         ON CONFLICT(album_id) DO UPDATE SET album_name = excluded.album_name, release_date = excluded.release_date, \
         loaded = cast(strftime('%s','now') as int)",
        ALBUM_TABLE.name
    ))?;
    let mut keys = HashSet::new();
    for album in albums {
        stmt.execute(params![album.album_id, album.album_name, album.release_date])
            .with_context(|| format!("Failed to write album {}", album.album_id))?;
        keys.insert(album.album_id.as_str());
    }
    Ok(keys.len())
}

fn insert_weekly_engagement(conn: &Connection, batch: &WeeklyEngagementBatch) -> Result<usize> {
    let week = batch.week_start.format(WEEK_FORMAT).to_string();
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (week_start, song_id, total_weekly_downloads, total_weekly_streams) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(week_start, song_id) DO UPDATE SET total_weekly_downloads = excluded.total_weekly_downloads, \
         total_weekly_streams = excluded.total_weekly_streams",
        WEEKLY_ENGAGEMENT_TABLE.name
    ))?;
    let mut keys = HashSet::new();
    for record in batch.records.iter() {
        stmt.execute(params![
            week,
            record.song_id,
            to_sql_count(record.total_weekly_downloads)?,
            to_sql_count(record.total_weekly_streams)?
        ])
        .with_context(|| format!("Failed to write engagement for {}", record.song_id))?;
        keys.insert(record.song_id.as_str());
    }
    if keys.len() < batch.records.len() {
        warn!(
            "Week {} lists {} songs more than once, keeping their last records",
            week,
            batch.records.len() - keys.len()
        );
    }
    Ok(keys.len())
}

impl RecordSink for SqliteRecordSink {
    fn write_artists(&self, artists: &[ArtistRecord]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stored = insert_artists(&tx, artists)?;
        tx.commit()?;
        debug!("Wrote {} artists", stored);
        Ok(stored)
    }

    fn write_albums(&self, albums: &[AlbumRecord]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stored = insert_albums(&tx, albums)?;
        tx.commit()?;
        debug!("Wrote {} albums", stored);
        Ok(stored)
    }

    fn write_weekly_engagement(&self, batch: &WeeklyEngagementBatch) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stored = insert_weekly_engagement(&tx, batch)?;
        tx.commit()?;
        debug!(
            "Wrote {} engagement records for week {}",
            stored, batch.week_start
        );
        Ok(stored)
    }

    /// All three tables in one transaction: on error nothing is stored.
    fn write_run(
        &self,
        artists: &[ArtistRecord],
        albums: &[AlbumRecord],
        batch: &WeeklyEngagementBatch,
    ) -> Result<WrittenRows> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let written = WrittenRows {
            artists: insert_artists(&tx, artists)?,
            albums: insert_albums(&tx, albums)?,
            engagement: insert_weekly_engagement(&tx, batch)?,
        };
        tx.commit()?;
        debug!("Wrote run for week {}: {:?}", batch.week_start, written);
        Ok(written)
    }
}
