use std::fs;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling temp path for an in-progress write: `<target>.tmp`.
pub fn tmp_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `bytes` to `target` via write-temp-then-rename.
///
/// The parent directory is created if missing. The rename replaces any
/// existing file atomically on POSIX; on platforms where renaming over an
/// existing file fails, the old file is removed first and atomicity is lost
/// for that one window. A failed write leaves at most a `.tmp` sibling,
/// never a partial final file.
pub fn write_replace(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }

    let tmp = tmp_path(target);
    fs::write(&tmp, bytes)?;

    match fs::rename(&tmp, target) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if target.exists() {
                fs::remove_file(target)?;
                fs::rename(&tmp, target)
            } else {
                let _ = fs::remove_file(&tmp);
                Err(rename_err)
            }
        }
    }
}
