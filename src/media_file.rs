use std::path::{Path, PathBuf};

use crate::errors::{AppError, Result};

// @module: Resolved input file

/// A media (or subtitle) file resolved from the command line input.
///
/// All derived names are computed once here so the orchestrators never
/// re-split the path themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    // @field: Path as given (made absolute when possible)
    pub path: PathBuf,

    // @field: Containing directory
    pub directory: PathBuf,

    // @field: File name with extension
    pub file_name: String,

    // @field: Extension without the dot, may be empty
    pub extension: String,

    // @field: File name without the last extension
    pub stem: String,
}

impl MediaFile {
    /// Resolve an input path, failing if it is missing or not a regular file
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppError::InputNotFound(path.to_path_buf()));
        }

        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(Self::from_path(path))
    }

    // @creates: MediaFile without touching the file system
    pub fn from_path(path: PathBuf) -> Self {
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            directory,
            file_name,
            extension,
            stem,
        }
    }

    /// Directory named after the file, used by `--create-dir`
    pub fn named_directory(&self) -> PathBuf {
        self.directory.join(&self.stem)
    }

    /// Sibling path the original is parked at while it is being re-muxed
    pub fn parked_path(&self) -> PathBuf {
        self.directory.join(format!("{}.old", self.file_name))
    }

    /// `{dir}/{stem}.{container}`
    pub fn path_with_container(&self, dir: &Path, container: &str) -> PathBuf {
        dir.join(format!("{}.{}", self.stem, container))
    }

    /// Working file written by a re-mux before it replaces the original
    pub fn working_path(&self, container: &str) -> PathBuf {
        self.directory.join(format!("{}.new.{}", self.stem, container))
    }
}
