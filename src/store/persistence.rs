//! Atomic file replacement for persisted corpus artifacts.

use crate::error::KegError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `content` so readers see either the old or the new
/// file, never a partial write.
///
/// The temporary file lives in the destination directory so the final rename
/// stays on one filesystem.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), KegError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| KegError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| KegError::io(parent, e))?;
    temp.write_all(content)
        .map_err(|e| KegError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| KegError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| KegError::io(path, e.error))?;

    tracing::debug!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}
