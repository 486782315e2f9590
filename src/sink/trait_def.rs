use crate::engagement::WeeklyEngagementBatch;
use crate::normalize::{AlbumRecord, ArtistRecord};
use anyhow::Result;

/// Rows stored by one `write_run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrittenRows {
    pub artists: usize,
    pub albums: usize,
    pub engagement: usize,
}

/// Destination for flattened records.
///
/// Writes are upserts: writing a record whose key already exists replaces
/// it, and that includes keys repeated inside a single call, where the last
/// occurrence wins. Every method returns the number of distinct keys stored.
pub trait RecordSink: Send + Sync {
    fn write_artists(&self, artists: &[ArtistRecord]) -> Result<usize>;

    fn write_albums(&self, albums: &[AlbumRecord]) -> Result<usize>;

    /// A song listed twice in `batch` ends up with one row holding its
    /// last record.
    fn write_weekly_engagement(&self, batch: &WeeklyEngagementBatch) -> Result<usize>;

    /// Writes the output of one run.
    ///
    /// The default issues the three writes in turn, so a failure part way
    /// leaves the earlier ones in place. Sinks that can should override it
    /// to store all of it or nothing.
    fn write_run(
        &self,
        artists: &[ArtistRecord],
        albums: &[AlbumRecord],
        batch: &WeeklyEngagementBatch,
    ) -> Result<WrittenRows> {
        Ok(WrittenRows {
            artists: self.write_artists(artists)?,
            albums: self.write_albums(albums)?,
            engagement: self.write_weekly_engagement(batch)?,
        })
    }
}
