/*!
 * Tests for file and directory utilities
 */

use std::path::PathBuf;
use anyhow::Result;
use subscrub::errors::AppError;
use subscrub::file_utils::{FileManager, format_bytes};
use crate::common;

/// Test output path generation
#[test]
fn test_generate_output_path_withLanguageTag_shouldJoinParts() {
    let path = FileManager::generate_output_path("/movies", "film", "eng.forced", "srt");
    assert_eq!(path, PathBuf::from("/movies/film.eng.forced.srt"));
}

/// Test that a free name is used as is
#[test]
fn test_next_available_output_path_withFreeName_shouldNotAddSuffix() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let path = FileManager::next_available_output_path(temp_dir.path(), "name", "eng", "srt", &[]);

    assert_eq!(path, temp_dir.path().join("name.eng.srt"));
    Ok(())
}

/// Test that existing files push the counter up
#[test]
fn test_next_available_output_path_withExistingFiles_shouldIncrement() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "name.eng.srt", "x")?;

    let first = FileManager::next_available_output_path(temp_dir.path(), "name", "eng", "srt", &[]);
    assert_eq!(first, temp_dir.path().join("name.eng.1.srt"));

    common::create_test_file(temp_dir.path(), "name.eng.1.srt", "x")?;
    let second = FileManager::next_available_output_path(temp_dir.path(), "name", "eng", "srt", &[]);
    assert_eq!(second, temp_dir.path().join("name.eng.2.srt"));
    Ok(())
}

/// Test that reserved paths count as taken
#[test]
fn test_next_available_output_path_withReservedPath_shouldSkipIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let reserved = vec![temp_dir.path().join("name.eng.srt")];

    let path = FileManager::next_available_output_path(temp_dir.path(), "name", "eng", "srt", &reserved);

    assert_eq!(path, temp_dir.path().join("name.eng.1.srt"));
    Ok(())
}

/// Test that rename refuses to overwrite
#[test]
fn test_rename_file_withExistingDestination_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let from = common::create_test_file(temp_dir.path(), "a.txt", "a")?;
    let to = common::create_test_file(temp_dir.path(), "b.txt", "b")?;

    let result = FileManager::rename_file(&from, &to);

    assert!(matches!(result, Err(AppError::OutputExists(ref p)) if p == &to));
    assert_eq!(FileManager::read_to_string(&to)?, "b");
    assert!(FileManager::file_exists(&from));
    Ok(())
}

/// Test moving a file into a directory that does not exist yet
#[test]
fn test_move_into_dir_withMissingDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_media(temp_dir.path(), "film.mkv")?;
    let target = temp_dir.path().join("film");

    let moved = FileManager::move_into_dir(&file, &target)?;

    assert_eq!(moved, target.join("film.mkv"));
    assert!(FileManager::dir_exists(&target));
    assert!(FileManager::file_exists(&moved));
    assert!(!file.exists());
    Ok(())
}

/// Test writing creates parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");
    assert_eq!(FileManager::file_size(&path)?, 7);
    Ok(())
}

/// Test byte formatting with binary units
#[test]
fn test_format_bytes_shouldUseBinaryUnits() {
    assert_eq!(format_bytes(0), "0.00 B");
    assert_eq!(format_bytes(1023), "1023.00 B");
    assert_eq!(format_bytes(1536), "1.50 KiB");
    assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
    assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GiB");
}
