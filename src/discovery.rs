use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::CheckError;

/// File name suffixes picked up from a directory listing.
pub const EXTENSIONS: &[&str] = &[".yml", ".yaml"];

/// Turn the target into the list of files to check.
///
/// Directory – its immediate regular files whose names end in `.yml` or
///             `.yaml`, sorted by path. Subdirectories are not descended.
/// File      – itself, whatever the extension.
pub fn resolve(target: &Path) -> Result<Vec<PathBuf>, CheckError> {
    if target.is_dir() {
        let entries = fs::read_dir(target).map_err(|e| list_err(target, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| list_err(target, e))?;
            let path = entry.path();

            if !is_candidate(&entry.file_name().to_string_lossy()) {
                continue;
            }
            // `Path::is_file` follows symlinks, so a linked workflow still counts.
            if !path.is_file() {
                warn!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            files.push(path);
        }

        // Listing order is OS dependent; sort for stable output.
        files.sort();
        debug!(dir = %target.display(), count = files.len(), "resolved candidates");
        Ok(files)
    } else if target.is_file() {
        Ok(vec![target.to_path_buf()])
    } else {
        Err(CheckError::PathNotFound {
            path: target.to_path_buf(),
        })
    }
}

pub fn is_candidate(name: &str) -> bool {
    EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn list_err(path: &Path, source: std::io::Error) -> CheckError {
    CheckError::ListDir {
        path: path.to_path_buf(),
        source,
    }
}
