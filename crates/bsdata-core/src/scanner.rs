//! Catalog discovery in a BSData repo checkout
//!
//! A repo checkout is a flat directory of `.cat` files plus shared
//! `.gst`/library files. Lookup is by faction name, exact first and then
//! by substring, so "Custodes" finds "Imperium - Adeptus Custodes.cat".

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find the catalog file for a faction
///
/// An exact `<faction>.cat` wins; otherwise the first catalog (in sorted
/// filename order) whose stem contains the faction string. No match is an
/// error carrying the available catalog names for the caller to list.
pub fn find_catalog<P: AsRef<Path>>(repo: P, faction: &str) -> Result<PathBuf> {
    let repo = repo.as_ref();

    let exact = repo.join(format!("{}.cat", faction));
    if exact.exists() {
        return Ok(exact);
    }

    let files = catalog_files(repo)?;
    match fuzzy_match(&files, faction) {
        Some(path) => Ok(path.clone()),
        None => Err(Error::CatalogNotFound {
            faction: faction.to_string(),
            available: catalog_stems(&files),
        }),
    }
}

/// All catalog names in the repo, excluding library files
pub fn list_catalogs<P: AsRef<Path>>(repo: P) -> Result<Vec<String>> {
    Ok(catalog_stems(&catalog_files(repo.as_ref())?))
}

/// Slug used in output file names
///
/// "Imperium - Adeptus Custodes" becomes "imperium-adeptus-custodes".
pub fn faction_slug(faction: &str) -> String {
    faction.to_lowercase().replace(" - ", "-").replace(' ', "-")
}

/// Catalog files directly under the repo root, sorted by path
fn catalog_files(repo: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(repo).max_depth(1).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "cat") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// First catalog whose stem contains the faction string
fn fuzzy_match<'a>(files: &'a [PathBuf], faction: &str) -> Option<&'a PathBuf> {
    files.iter().find(|path| stem(path).contains(faction))
}

/// Catalog stems with library files filtered out
fn catalog_stems(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .filter(|path| !file_name(path).contains("Library"))
        .map(|path| stem(path).to_string())
        .collect()
}

fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}
