//! Delivery of finished artifacts
//!
//! A sink receives the complete file in one call and either stores all of it
//! or nothing. The artifact is moved into the sink and its buffer is released
//! when delivery returns.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;

use crate::Result;

/// A finished export ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Destination for exported files
pub trait DownloadSink: Send + Sync {
    /// Stores `artifact` under its file name. An existing file with the same
    /// name is replaced.
    fn deliver(&self, artifact: Artifact) -> Result<PathBuf>;
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: Artifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(&artifact.file_name);
        let partial = self.dir.join(format!(".{}.part", artifact.file_name));
        if let Err(e) = fs::write(&partial, &artifact.bytes).and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        info!(
            "saved {} ({} bytes) to {}",
            artifact.file_name,
            artifact.bytes.len(),
            target.display()
        );
        Ok(target)
    }
}

/// Keeps delivered artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<Artifact>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: Artifact) -> Result<PathBuf> {
        let path = PathBuf::from(&artifact.file_name);
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(artifact);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, bytes: &[u8]) -> Artifact {
        Artifact {
            file_name: name.to_string(),
            mime_type: "image/png",
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn directory_sink_replaces_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let first = sink.deliver(artifact("poster-2025-11-04.png", b"one")).unwrap();
        let second = sink.deliver(artifact("poster-2025-11-04.png", b"two")).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"two");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1, "no partial files left behind");
    }

    #[test]
    fn directory_sink_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("posters");
        let path = DirectorySink::new(&nested)
            .deliver(artifact("poster-2025-01-01.pdf", b"%PDF"))
            .unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.deliver(artifact("a.png", b"1")).unwrap();
        sink.deliver(artifact("b.pdf", b"2")).unwrap();
        let names: Vec<_> = sink.artifacts().into_iter().map(|a| a.file_name).collect();
        assert_eq!(names, ["a.png", "b.pdf"]);
    }
}
