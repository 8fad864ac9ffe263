//! Line scraping over the resource directory.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::format::{Annotation, AnnotationFormat};
use crate::error::{AuditError, Result};
use crate::fs_utils::resource_files;

/// Everything one scan produced.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Matched records in scan order (file name order, then line order).
    pub records: Vec<Annotation>,
    pub files_scanned: usize,
    /// Lines carrying an `@` that the format did not accept.
    pub unmatched: usize,
}

/// Scan every resource file directly inside `dir` whose name ends in one of
/// `extensions`.
pub fn scan_directory(
    dir: &Path,
    extensions: &[String],
    format: &AnnotationFormat,
) -> Result<ScanResult> {
    let mut result = ScanResult::default();
    for path in resource_files(dir, extensions)? {
        let bytes = fs::read(&path).map_err(|e| AuditError::io(&path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        let origin = path.display().to_string();
        let before = result.records.len();
        scan_text(&text, &origin, format, &mut result);
        debug!(
            "{}: {} annotation(s)",
            origin,
            result.records.len() - before
        );
        result.files_scanned += 1;
    }
    info!(
        "format `{}`: {} annotation(s) from {} file(s), {} unmatched @-line(s)",
        format.name(),
        result.records.len(),
        result.files_scanned,
        result.unmatched
    );
    Ok(result)
}

/// Extract annotations from one file's contents into `result`.
pub fn scan_text(text: &str, origin: &str, format: &AnnotationFormat, result: &mut ScanResult) {
    for (idx, line) in text.lines().enumerate() {
        match format.extract(line) {
            Some(record) => result.records.push(record),
            None if line.contains('@') => {
                debug!("{}:{}: skipped @-line: {}", origin, idx + 1, line.trim());
                result.unmatched += 1;
            }
            None => {}
        }
    }
}
