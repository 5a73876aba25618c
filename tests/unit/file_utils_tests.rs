/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use srt_translator::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_fileExists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generateOutputPath_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/movie.srt"),
        Path::new("/tmp/output"),
        "fr",
        "srt",
    );
    assert_eq!(output_path, Path::new("/tmp/output/movie.fr.srt"));
}

#[test]
fn test_siblingOutputPath_shouldStayNextToInput() {
    let output_path = FileManager::sibling_output_path(Path::new("/subs/show/ep1.srt"), "zh-Hans");
    assert_eq!(output_path, Path::new("/subs/show/ep1.zh-Hans.srt"));
}

#[test]
fn test_isTranslationOutput_shouldMatchLanguageSuffix() {
    assert!(FileManager::is_translation_output("ep1.fr.srt", "fr"));
    assert!(FileManager::is_translation_output("ep1.FR.srt", "fr"));
    assert!(!FileManager::is_translation_output("ep1.srt", "fr"));
    assert!(!FileManager::is_translation_output("ep1.en.srt", "fr"));
}

/// Files are found recursively, sorted, by extension only
#[test]
fn test_findFiles_shouldWalkSubdirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "b.srt", "")?;
    common::create_test_file(temp_dir.path(), "a.SRT", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "c.srt", "")?;

    let files = FileManager::find_files(temp_dir.path(), "srt")?;
    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.SRT", "b.srt", "c.srt"]);
    Ok(())
}

/// Writing creates missing parent directories
#[test]
fn test_writeToFile_shouldCreateParentsAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("dir").join("conf.json");

    FileManager::write_to_file(&path, "{}")?;
    assert_eq!(FileManager::read_to_string(&path)?, "{}");
    Ok(())
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("no/such/file.json").is_err());
}
