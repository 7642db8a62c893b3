use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{AppError, Result};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Creating directory: {}", path.display());
            fs::create_dir_all(path).map_err(|e| {
                AppError::File(format!("Failed to create directory {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    // @generates: `{output_dir}/{stem}.{language}.{extension}`
    pub fn generate_output_path<P: AsRef<Path>>(
        output_dir: P,
        stem: &str,
        language: &str,
        extension: &str,
    ) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("{}.{}.{}", stem, language, extension))
    }

    /// First path of the form `{stem}.{language}[.N].{extension}` that neither
    /// exists nor is in `reserved`.
    ///
    /// The unsuffixed name is tried first, then `.1`, `.2`, and so on.
    pub fn next_available_output_path<P: AsRef<Path>>(
        output_dir: P,
        stem: &str,
        language: &str,
        extension: &str,
        reserved: &[PathBuf],
    ) -> PathBuf {
        let output_dir = output_dir.as_ref();
        let mut candidate = Self::generate_output_path(output_dir, stem, language, extension);
        let mut counter = 0;
        while candidate.exists() || reserved.contains(&candidate) {
            counter += 1;
            candidate = output_dir.join(format!("{}.{}.{}.{}", stem, language, counter, extension));
        }
        candidate
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map_err(|e| AppError::File(format!("Failed to read file {}: {}", path.display(), e)))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, content)
            .map_err(|e| AppError::File(format!("Failed to write to file {}: {}", path.display(), e)))
    }

    /// Rename a file, refusing to clobber an existing destination
    pub fn rename_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if to.exists() {
            return Err(AppError::OutputExists(to.to_path_buf()));
        }

        debug!("Moving {} -> {}", from.display(), to.display());
        fs::rename(from, to).map_err(|e| {
            AppError::File(format!(
                "Failed to move {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }

    /// Move a file into `dir`, keeping its file name
    pub fn move_into_dir<P1: AsRef<Path>, P2: AsRef<Path>>(file: P1, dir: P2) -> Result<PathBuf> {
        let file = file.as_ref();
        let dir = dir.as_ref();
        let file_name = file
            .file_name()
            .ok_or_else(|| AppError::File(format!("Not a file path: {}", file.display())))?;

        Self::ensure_dir(dir)?;
        let destination = dir.join(file_name);
        Self::rename_file(file, &destination)?;
        Ok(destination)
    }

    /// Delete a file
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Deleting {}", path.display());
        fs::remove_file(path)
            .map_err(|e| AppError::File(format!("Failed to delete {}: {}", path.display(), e)))
    }

    /// Size of a file in bytes
    pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
        let path = path.as_ref();
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| AppError::File(format!("Failed to stat {}: {}", path.display(), e)))
    }
}

/// Human readable byte count with binary units, e.g. `1.50 GiB`
pub fn format_bytes(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = size as f64;
    let mut unit = UNITS[0];
    for candidate in UNITS {
        unit = candidate;
        if value < 1024.0 || candidate == "TiB" {
            break;
        }
        value /= 1024.0;
    }
    format!("{:.2} {}", value, unit)
}
