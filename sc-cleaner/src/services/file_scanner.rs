//! Input track discovery
//!
//! Lists the files directly inside the input directory whose extension
//! matches the configured one (case-insensitive). Subdirectories are not
//! descended into. Results are sorted by path so batch order is stable.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Track discovery errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory listing failed
    #[error("File access error {0}: {1}")]
    FileAccessError(PathBuf, String),
}

/// Non-recursive track scanner
pub struct FileScanner {
    extension: String,
    ignore_patterns: Vec<String>,
}

impl FileScanner {
    /// Create a scanner for `extension` (leading dot optional)
    ///
    /// Ignores system files like .DS_Store and Thumbs.db.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
            ignore_patterns: vec![".DS_Store".to_string(), "Thumbs.db".to_string()],
        }
    }

    /// Extension matched by this scanner, lowercase without leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// List matching tracks in `root_path`, sorted by path
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut tracks = Vec::new();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.matches(&entry) {
                        tracks.push(entry.into_path());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    // The root itself is unreadable
                    return Err(ScanError::FileAccessError(
                        root_path.to_path_buf(),
                        e.to_string(),
                    ));
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    // Continue scanning, don't abort
                }
            }
        }

        tracks.sort();

        tracing::debug!(
            dir = %root_path.display(),
            extension = %self.extension,
            count = tracks.len(),
            "Track discovery complete"
        );

        Ok(tracks)
    }

    fn matches(&self, entry: &DirEntry) -> bool {
        let file_name = entry.file_name().to_string_lossy();

        if self
            .ignore_patterns
            .iter()
            .any(|pattern| file_name.contains(pattern.as_str()))
        {
            return false;
        }

        entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}
