use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref DUMP_FILENAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_\-]+\.json$")
        .expect("Invalid Regex, this should be fixed at compile time.");
}

#[derive(Debug)]
struct Dirs {
    artists: PathBuf,
    albums: PathBuf,
    tracks: PathBuf,
}

impl Dirs {
    fn from_root(root: &Path) -> Result<Dirs> {
        if !root.is_dir() {
            bail!("{} is not a valid directory.", root.display());
        }

        let artists = root.join("artists");
        let albums = root.join("albums");
        let tracks = root.join("tracks");

        if !artists.is_dir() {
            bail!("No artists dir in {}", root.display());
        }

        if !albums.is_dir() {
            bail!("No albums dir in {}", root.display());
        }

        if !tracks.is_dir() {
            bail!("No tracks dir in {}", root.display());
        }

        Ok(Dirs {
            artists,
            albums,
            tracks,
        })
    }
}

/// A dump file holds either a single object or a page `{ "items": [...] }`.
/// Items are kept as raw JSON so one bad item only costs that item.
fn parse_dump_file(text: &str) -> Result<Vec<Value>, String> {
    let mut value: Value = serde_json::from_str(text).map_err(|err| err.to_string())?;
    match value.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!("\"items\" is not an array: {}", other)),
        None => Ok(vec![value]),
    }
}

/// Non-fatal issues found while reading a dump directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    InvalidFileName(String),
    ReadFailure(String),
    ParseFailure(String),
}

/// Already-fetched catalog metadata, as written by the upstream API client.
/// Records stay raw until normalization so each is judged on its own.
#[derive(Debug, Default)]
pub struct CatalogDump {
    pub artists: Vec<Value>,
    pub albums: Vec<Value>,
    pub tracks: Vec<Value>,
}

pub struct DumpBuildResult {
    pub dump: CatalogDump,
    pub problems: Vec<Problem>,
}

fn list_dump_files(dir: &Path) -> Result<(Vec<PathBuf>, Vec<Problem>)> {
    let mut files = vec![];
    let mut problems = vec![];
    for dir_entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Could not list directory {}", dir.display()))?
    {
        let path = dir_entry_result?.path();
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        if !DUMP_FILENAME_REGEX.is_match(&filename) {
            problems.push(Problem::InvalidFileName(path.display().to_string()));
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok((files, problems))
}

fn parse_dir(dir: &Path, problems: &mut Vec<Problem>) -> Result<Vec<Value>> {
    let (files, mut listing_problems) = list_dump_files(dir)?;
    problems.append(&mut listing_problems);

    let mut out = vec![];
    for path in files {
        let file_text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                problems.push(Problem::ReadFailure(format!("{} - {}", path.display(), err)));
                continue;
            }
        };
        match parse_dump_file(&file_text) {
            Ok(mut items) => out.append(&mut items),
            Err(err) => {
                problems.push(Problem::ParseFailure(format!("{} - {}", path.display(), err)))
            }
        }
    }
    Ok(out)
}

impl CatalogDump {
    /// Reads `artists/`, `albums/` and `tracks/` under `root_dir`.
    /// Fails only if the directory layout is wrong, unreadable files are
    /// reported as problems.
    pub fn build(root_dir: &Path) -> Result<DumpBuildResult> {
        let dirs = Dirs::from_root(root_dir)?;
        let mut problems = vec![];

        let artists = parse_dir(&dirs.artists, &mut problems)?;
        let albums = parse_dir(&dirs.albums, &mut problems)?;
        let tracks = parse_dir(&dirs.tracks, &mut problems)?;

        Ok(DumpBuildResult {
            dump: CatalogDump {
                artists,
                albums,
                tracks,
            },
            problems,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_dump_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for sub in ["artists", "albums", "tracks"] {
            fs::create_dir(temp_dir.path().join(sub)).unwrap();
        }
        temp_dir
    }

    #[test]
    fn fails_without_subdirs() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("artists")).unwrap();

        assert!(CatalogDump::build(temp_dir.path()).is_err());
    }

    #[test]
    fn reads_single_objects_and_pages() {
        let temp_dir = create_dump_dir();
        let root = temp_dir.path();
        fs::write(
            root.join("artists/artist_A1.json"),
            r#"{ "id": "A1", "name": "One", "followers": { "total": 1 } }"#,
        )
        .unwrap();
        fs::write(
            root.join("artists/page_0.json"),
            r#"{ "href": "x", "items": [ { "id": "A2", "name": "Two" }, { "id": "A3", "name": "Three" } ], "next": null }"#,
        )
        .unwrap();
        fs::write(
            root.join("tracks/page_0.json"),
            r#"{ "items": [ { "id": "T1" }, { "id": "T2" } ] }"#,
        )
        .unwrap();

        let result = CatalogDump::build(root).unwrap();

        assert!(result.problems.is_empty());
        let ids: Vec<_> = result
            .dump
            .artists
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
        assert!(result.dump.albums.is_empty());
        assert_eq!(result.dump.tracks.len(), 2);
    }

    #[test]
    fn bad_item_does_not_drop_its_page() {
        let temp_dir = create_dump_dir();
        let root = temp_dir.path();
        fs::write(
            root.join("artists/page_0.json"),
            r#"{ "items": [
                { "id": "A1", "name": "One", "followers": { "total": 1 } },
                { "id": "A2", "name": "Two", "followers": { "total": "many" } },
                { "id": "A3", "name": "Three", "followers": { "total": 3 } }
            ] }"#,
        )
        .unwrap();

        let result = CatalogDump::build(root).unwrap();

        assert!(result.problems.is_empty());
        assert_eq!(result.dump.artists.len(), 3);
    }

    #[test]
    fn page_without_item_array_is_a_problem() {
        let temp_dir = create_dump_dir();
        let root = temp_dir.path();
        fs::write(root.join("tracks/page_0.json"), r#"{ "items": { "id": "T1" } }"#).unwrap();

        let result = CatalogDump::build(root).unwrap();

        assert!(result.dump.tracks.is_empty());
        assert!(matches!(&result.problems[..], [Problem::ParseFailure(_)]));
    }

    #[test]
    fn reports_bad_files_as_problems() {
        let temp_dir = create_dump_dir();
        let root = temp_dir.path();
        fs::write(root.join("albums/broken.json"), "{ not json").unwrap();
        fs::write(root.join("albums/notes.txt"), "hello").unwrap();
        fs::write(
            root.join("albums/good.json"),
            r#"{ "id": "B1", "name": "Album", "release_date": "2020-01-01" }"#,
        )
        .unwrap();

        let result = CatalogDump::build(root).unwrap();

        assert_eq!(result.dump.albums.len(), 1);
        assert_eq!(result.problems.len(), 2);
        assert!(result
            .problems
            .iter()
            .any(|p| matches!(p, Problem::ParseFailure(s) if s.contains("broken.json"))));
        assert!(result
            .problems
            .iter()
            .any(|p| matches!(p, Problem::InvalidFileName(s) if s.contains("notes.txt"))));
    }
}
