use anyhow::{bail, Result};
use rusqlite::Connection;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub columns: &'static [&'static str],
    pub indices: &'static [&'static str],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(self.schema, [])?;
        for index in self.indices {
            conn.execute(index, [])?;
        }
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))?
            .collect::<Result<_, _>>()?;

        if columns != self.columns {
            bail!(
                "Schema validation failed for {} table. found {:?}",
                self.name,
                columns
            );
        }
        Ok(())
    }
}

pub const ARTIST_TABLE: Table = Table {
    name: "artist",
    schema: "CREATE TABLE IF NOT EXISTS artist (artist_id TEXT NOT NULL, name TEXT NOT NULL, followers INTEGER NOT NULL, loaded INTEGER DEFAULT (cast(strftime('%s','now') as int)), PRIMARY KEY (artist_id));",
    columns: &["artist_id", "name", "followers", "loaded"],
    indices: &[],
};

pub const ALBUM_TABLE: Table = Table {
    name: "album",
    schema: "CREATE TABLE IF NOT EXISTS album (album_id TEXT NOT NULL, album_name TEXT NOT NULL, release_date TEXT NOT NULL, loaded INTEGER DEFAULT (cast(strftime('%s','now') as int)), PRIMARY KEY (album_id));",
    columns: &["album_id", "album_name", "release_date", "loaded"],
    indices: &["CREATE INDEX IF NOT EXISTS album_release_date_index ON album (release_date);"],
};

pub const WEEKLY_ENGAGEMENT_TABLE: Table = Table {
    name: "weekly_engagement",
    schema: "CREATE TABLE IF NOT EXISTS weekly_engagement (week_start TEXT NOT NULL, song_id TEXT NOT NULL, total_weekly_downloads INTEGER NOT NULL, total_weekly_streams INTEGER NOT NULL, PRIMARY KEY (week_start, song_id));",
    columns: &[
        "week_start",
        "song_id",
        "total_weekly_downloads",
        "total_weekly_streams",
    ],
    indices: &["CREATE INDEX IF NOT EXISTS weekly_engagement_song_index ON weekly_engagement (song_id);"],
};

pub const TABLES: &[Table] = &[ARTIST_TABLE, ALBUM_TABLE, WEEKLY_ENGAGEMENT_TABLE];
