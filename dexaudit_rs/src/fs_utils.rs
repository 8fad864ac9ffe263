use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AuditError, Result};

/// True when the file name ends in `.<ext>` for one of `extensions`.
/// Case-sensitive; a leading dot in the configured extension is ignored.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.');
        !ext.is_empty()
            && name.len() > ext.len()
            && name.ends_with(ext)
            && name[..name.len() - ext.len()].ends_with('.')
    })
}

/// Regular files directly inside `dir` (no recursion) with a matching
/// extension, sorted by file name.
pub fn resource_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(dir).map_err(|e| AuditError::io(dir, e))?;
    if !meta.is_dir() {
        return Err(AuditError::io(
            dir,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| AuditError::io(dir, e.into()))?;
        if entry.file_type().is_file() && matches_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
