//! Writing finished workout trees to disk.
//!
//! Files are written to a temp file in the target directory and renamed
//! over the destination, so a failed run never leaves a half-written file.

use crate::{Error, Result, Workout};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize workouts as a compact JSON array at `path`
pub fn write_workouts(path: &Path, workouts: &[Workout]) -> Result<()> {
    let contents = serde_json::to_string(workouts)?;
    write_atomic(path, contents.as_bytes())?;
    tracing::info!("Wrote {} workouts to {:?}", workouts.len(), path);
    Ok(())
}

/// Replace `path` with `contents` via temp file + rename
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;

    // serialize concurrent writers of the same target
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
