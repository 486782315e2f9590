mod schema;
mod sqlite_sink;
mod trait_def;

pub use sqlite_sink::SqliteRecordSink;
pub use trait_def::{RecordSink, WrittenRows};
