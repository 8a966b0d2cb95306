//! Path utilities for the on-disk case layout.
//!
//! ```text
//! <out>/<preset>/<fork>/ssz_static/<Type>/<suite>/<case>/
//!     value.json
//!     serialized.ssz
//!     roots.json
//! ```

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use ssz_static_core::{CasePart, TestCase};

/// Marker left in a case directory until every part has been written.
pub const INCOMPLETE_MARKER: &str = "INCOMPLETE";

/// Get the directory a case is written to.
pub fn case_dir(output_root: &Path, case: &TestCase) -> PathBuf {
    output_root.join(case.relative_dir())
}

/// Get the path of the incomplete-marker file for a case directory.
pub fn incomplete_marker_path(case_dir: &Path) -> PathBuf {
    case_dir.join(INCOMPLETE_MARKER)
}

/// Get the file path of one case part (`<name>.json` or `<name>.ssz`).
pub fn part_path(case_dir: &Path, part: &CasePart) -> PathBuf {
    case_dir.join(format!("{}.{}", part.name, part.data.file_extension()))
}

/// Ensure all parent directories exist for a path.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Write a file atomically (write to .tmp, then rename).
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

/// Write a JSON file atomically (pretty-printed, trailing newline).
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json =
        serde_json::to_vec_pretty(value).map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
    json.push(b'\n');
    atomic_write(path, &json)
}
