//! A snapshot source backed by still images on disk.
//!
//! Stands in for a camera when running the booth headless: each capture
//! returns the next image of the directory, wrapping around.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use photobooth_common::error::{BoothError, BoothResult};

use super::SnapshotSource;

/// Extensions the compositor can decode.
const STILL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub struct StillsSource {
    name: String,
    stills: Vec<Vec<u8>>,
    next: AtomicUsize,
}

impl StillsSource {
    /// Load every supported image in `dir`, sorted by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> BoothResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(BoothError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_still(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(BoothError::source(format!(
                "No .jpg/.jpeg/.png images in {}",
                dir.display()
            )));
        }

        let mut source = Self::from_files(&paths)?;
        source.name = format!("stills:{}", dir.display());
        Ok(source)
    }

    /// Load the given files in order.
    pub fn from_files(paths: &[PathBuf]) -> BoothResult<Self> {
        if paths.is_empty() {
            return Err(BoothError::source("No still images given"));
        }
        let stills = paths
            .iter()
            .map(|path| {
                if !path.exists() {
                    return Err(BoothError::FileNotFound { path: path.clone() });
                }
                Ok(std::fs::read(path)?)
            })
            .collect::<BoothResult<Vec<_>>>()?;

        tracing::debug!(count = stills.len(), "Loaded still images");
        Ok(Self::from_bytes("stills", stills))
    }

    /// Serve in-memory stills.
    pub fn from_bytes(name: impl Into<String>, stills: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            stills,
            next: AtomicUsize::new(0),
        }
    }

    /// Number of distinct stills served.
    pub fn len(&self) -> usize {
        self.stills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stills.is_empty()
    }
}

impl SnapshotSource for StillsSource {
    fn capture_frame(&self) -> Option<Vec<u8>> {
        if self.stills.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst) % self.stills.len();
        self.stills.get(index).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn is_still(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| STILL_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}
