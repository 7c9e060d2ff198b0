//! Byte sources for ingestion
//!
//! The pipeline never opens dialogs or guesses locations itself; it asks an
//! injected [`FileSource`] for bytes. A source answers `Ok(None)` when it has
//! nothing to offer and `Err` only when reading failed.

use crate::error::{IngestError, IngestResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What the caller is asking for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRequest {
    /// Accepted file extensions (lower-case, no dot); empty accepts anything
    pub extensions: Vec<String>,
}

impl SourceRequest {
    /// Accept any file
    pub fn any() -> Self {
        Self::default()
    }

    /// Accept `.csv` files only
    pub fn csv() -> Self {
        Self {
            extensions: vec!["csv".to_string()],
        }
    }

    /// Whether a path satisfies the extension filter
    pub fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }
}

/// Bytes delivered by a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name (path or upload name)
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Capability to hand over input bytes
pub trait FileSource {
    fn fetch(&self, request: &SourceRequest) -> IngestResult<Option<SourceFile>>;
}

fn read_file(path: &Path) -> IngestResult<SourceFile> {
    let bytes = std::fs::read(path)
        .map_err(|e| IngestError::Source(format!("Failed to read {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read input file");
    Ok(SourceFile {
        name: path.display().to_string(),
        bytes,
    })
}

/// Explicit filesystem path
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FileSource for PathSource {
    fn fetch(&self, request: &SourceRequest) -> IngestResult<Option<SourceFile>> {
        if !self.path.is_file() {
            warn!(path = %self.path.display(), "Input file does not exist");
            return Ok(None);
        }
        if !request.accepts(&self.path) {
            warn!(path = %self.path.display(), "Input file has an unaccepted extension");
            return Ok(None);
        }
        read_file(&self.path).map(Some)
    }
}

/// Ordered list of default locations; the first existing file wins
#[derive(Debug, Clone, Default)]
pub struct DefaultLocationSource {
    candidates: Vec<PathBuf>,
}

impl DefaultLocationSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// First candidate that exists and passes the request filter
    pub fn locate(&self, request: &SourceRequest) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file() && request.accepts(p))
    }
}

impl FileSource for DefaultLocationSource {
    fn fetch(&self, request: &SourceRequest) -> IngestResult<Option<SourceFile>> {
        match self.locate(request) {
            Some(path) => {
                info!(path = %path.display(), "Using default input file");
                read_file(path).map(Some)
            }
            None => {
                warn!(candidates = self.candidates.len(), "Default input file not found");
                Ok(None)
            }
        }
    }
}

/// Bytes already in memory (uploads, tests)
#[derive(Debug, Clone)]
pub struct MemorySource {
    file: SourceFile,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file: SourceFile {
                name: name.into(),
                bytes: bytes.into(),
            },
        }
    }
}

impl FileSource for MemorySource {
    fn fetch(&self, request: &SourceRequest) -> IngestResult<Option<SourceFile>> {
        if !request.accepts(Path::new(&self.file.name)) {
            return Ok(None);
        }
        Ok(Some(self.file.clone()))
    }
}
