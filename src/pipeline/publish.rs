//! All-or-nothing, no-replace file publication.
//!
//! Bytes go to a unique temporary file next to the destination, are flushed, and are then
//! hard-linked into place. Linking fails if the destination already exists, so the existence
//! check and the write happen as one step and a concurrent writer can never clobber or truncate
//! an asset that is already published.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime},
};

use crate::foundation::error::{MediaError, MediaResult};

/// Result of [`publish_new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The file did not exist and now holds the new bytes.
    Created,
    /// Another file already occupied the path; nothing was changed.
    AlreadyExists,
}

/// Temp files untouched for this long are leftovers of an interrupted writer.
pub const STALE_TEMP_AGE: Duration = Duration::from_secs(60);

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

struct TempFile {
    path: PathBuf,
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| MediaError::io(parent, e))?;
    }
    Ok(())
}

/// Write `bytes` to `path` unless a file is already there.
pub fn publish_new(path: &Path, bytes: &[u8]) -> MediaResult<PublishOutcome> {
    ensure_parent_dir(path)?;
    if path.exists() {
        return Ok(PublishOutcome::AlreadyExists);
    }

    let tmp = TempFile {
        path: temp_path_for(path)?,
    };
    {
        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp.path)
            .map_err(|e| MediaError::io(&tmp.path, e))?;
        f.write_all(bytes).map_err(|e| MediaError::io(&tmp.path, e))?;
        f.sync_all().map_err(|e| MediaError::io(&tmp.path, e))?;
    }

    match std::fs::hard_link(&tmp.path, path) {
        Ok(()) => Ok(PublishOutcome::Created),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(PublishOutcome::AlreadyExists)
        }
        Err(link_err) => {
            // Filesystems without hard links: fall back to a rename, re-checking first.
            tracing::debug!(
                path = %path.display(),
                error = %link_err,
                "hard link failed; renaming"
            );
            if path.exists() {
                return Ok(PublishOutcome::AlreadyExists);
            }
            std::fs::rename(&tmp.path, path).map_err(|e| MediaError::io(path, e))?;
            Ok(PublishOutcome::Created)
        }
    }
}

/// Remove publish temp files in `dir` older than `max_age`. Returns how many were removed.
///
/// Younger temp files may belong to a writer that is still running and are left alone.
pub fn sweep_stale_temps(dir: &Path, max_age: Duration) -> MediaResult<usize> {
    let entries = std::fs::read_dir(dir).map_err(|e| MediaError::io(dir, e))?;
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !is_temp_name(&name.to_string_lossy()) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if now.duration_since(modified).unwrap_or_default() < max_age {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(MediaError::io(entry.path(), e)),
        }
    }

    if removed > 0 {
        tracing::debug!(dir = %dir.display(), removed, "removed stale temp files");
    }
    Ok(removed)
}

/// Matches `.{name}.{pid}.{counter}.tmp` as produced by [`publish_new`].
fn is_temp_name(name: &str) -> bool {
    let Some(inner) = name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(".tmp"))
    else {
        return false;
    };
    let mut parts = inner.rsplitn(3, '.');
    let counter = parts.next().unwrap_or_default();
    let pid = parts.next().unwrap_or_default();
    let stem = parts.next().unwrap_or_default();
    !stem.is_empty()
        && [counter, pid]
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

fn temp_path_for(path: &Path) -> MediaResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        MediaError::validation(format!("output path '{}' has no file name", path.display()))
    })?;
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        ".{}.{}.{n}.tmp",
        name.to_string_lossy(),
        std::process::id()
    );
    Ok(path.with_file_name(tmp_name))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/publish.rs"]
mod tests;
