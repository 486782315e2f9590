mod album;
mod artist;
mod dump;
mod load;
mod track;

pub use album::SourceAlbum;
pub use artist::{Followers, SourceArtist};
pub use dump::{CatalogDump, DumpBuildResult, Problem as LoadDumpProblem};
pub use load::load_dump;
pub use track::SourceTrack;
