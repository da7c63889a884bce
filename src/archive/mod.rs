//! Archive discovery and import.

pub mod importer;

pub use importer::{import_archive, ImportSummary};

use crate::error::{ChartError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolve an import argument into archive files.
///
/// A file is returned as-is. A directory is walked recursively for
/// `*.toml` files, skipping hidden entries, sorted by path.
pub fn discover_archives(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(ChartError::io(
            format!("Archive path not found: {}", path.display()),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let mut archives = Vec::new();
    let walker = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|e| e.to_str()) == Some("toml") {
            archives.push(p.to_path_buf());
        }
    }

    archives.sort();
    Ok(archives)
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map(|n| n.starts_with('.')).unwrap_or(false)
}
