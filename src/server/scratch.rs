//! Scratch storage for uploaded files.
//!
//! Uploads are persisted under a configured scratch directory for the
//! duration of one request. Names are generated, never taken from the
//! client, which removes the path-traversal and concurrent-overwrite
//! hazards of client-controlled filenames. Deletion is guaranteed on every
//! exit path, including panic unwind, by the temp-file guard's `Drop`.

use crate::core::errors::PredictResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The scratch directory uploads are written into.
#[derive(Debug)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Opens the scratch directory, creating it if absent.
    pub fn ensure(root: impl Into<PathBuf>) -> PredictResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the scratch directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes uploaded bytes to a uniquely named file in the scratch
    /// directory.
    ///
    /// The client filename contributes only its (sanitized) extension; the
    /// rest of the name is generated. The returned guard deletes the file
    /// when dropped.
    pub fn store(&self, client_filename: &str, bytes: &[u8]) -> PredictResult<ScratchFile> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&extension_suffix(client_filename))
            .tempfile_in(&self.root)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(ScratchFile { file })
    }
}

/// A per-request upload on disk, deleted when the guard is dropped.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Returns the on-disk path of the upload.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Extracts a safe `.ext` suffix from a client filename, or an empty string
/// if the extension is missing or contains anything but ASCII alphanumerics.
fn extension_suffix(client_filename: &str) -> String {
    match Path::new(client_filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{ext}")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_writes_bytes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::ensure(dir.path()).unwrap();

        let file = scratch.store("xray.png", b"fake bytes").unwrap();
        assert!(file.path().starts_with(dir.path()));
        assert_eq!(std::fs::read(file.path()).unwrap(), b"fake bytes");
    }

    #[test]
    fn test_drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::ensure(dir.path()).unwrap();

        let path = {
            let file = scratch.store("xray.png", b"bytes").unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_client_filename_never_becomes_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::ensure(dir.path()).unwrap();

        let file = scratch.store("../../etc/passwd", b"x").unwrap();
        assert!(file.path().starts_with(dir.path()));
        assert!(!file.path().to_string_lossy().contains(".."));
    }

    #[test]
    fn test_concurrent_identical_filenames_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::ensure(dir.path()).unwrap();

        let a = scratch.store("same.jpg", b"a").unwrap();
        let b = scratch.store("same.jpg", b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"a");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn test_extension_sanitization() {
        assert_eq!(extension_suffix("scan.png"), ".png");
        assert_eq!(extension_suffix("scan"), "");
        assert_eq!(extension_suffix("scan.p/ng"), "");
        assert_eq!(extension_suffix(""), "");
    }

    #[test]
    fn test_ensure_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/uploads");
        let scratch = ScratchDir::ensure(&nested).unwrap();
        assert!(scratch.root().is_dir());
    }
}
