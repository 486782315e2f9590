use super::CatalogDump;
use anyhow::{bail, Result};
use tracing::{info, warn};

/// Loads a dump directory, logging any non-fatal problems.
/// With `fail_on_problems` any problem makes the load fail.
pub fn load_dump<P: AsRef<std::path::Path>>(path: P, fail_on_problems: bool) -> Result<CatalogDump> {
    info!("Reading catalog dump at {}...", path.as_ref().display());
    let build_result = CatalogDump::build(path.as_ref())?;
    let problems = build_result.problems;
    let dump = build_result.dump;

    if !problems.is_empty() {
        warn!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            warn!("- {:?}", problem);
        }
        if fail_on_problems {
            bail!(
                "Catalog dump has {} problems, refusing to continue.",
                problems.len()
            );
        }
    }

    if dump.is_empty() {
        warn!("Catalog dump at {} is empty.", path.as_ref().display());
    }
    info!(
        "Catalog dump has:\n{} artists\n{} albums\n{} tracks",
        dump.artists.len(),
        dump.albums.len(),
        dump.tracks.len()
    );
    Ok(dump)
}
