/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use vocabport::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "words.csv", "a,b\n1,2")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Import discovery is recursive and limited to .csv/.json
#[test]
fn test_find_import_files_withMixedTree_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(temp_dir.path(), "b.JSON", "[]")?;
    common::create_test_file(temp_dir.path(), "a.csv", "x")?;
    common::create_test_file(temp_dir.path(), "readme.md", "x")?;
    common::create_test_file(&nested, "c.csv", "x")?;

    let files = FileManager::find_import_files(temp_dir.path())?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.csv", "b.JSON", "nested/c.csv"]);

    Ok(())
}

/// Extension decides the type before content does
#[test]
fn test_detect_file_type_withExtension_shouldUseExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "list.csv", "[not json]")?;

    assert_eq!(FileManager::detect_file_type(&file)?, FileType::Csv);

    Ok(())
}

/// Unknown extensions fall back to a content sniff
#[test]
fn test_detect_file_type_withoutExtension_shouldSniffContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = common::create_test_file(temp_dir.path(), "export.txt", "\n  [{\"word\": \"a\"}]")?;
    let csv = common::create_test_file(temp_dir.path(), "export.dat", "word,meaning\na,b")?;
    let other = common::create_test_file(temp_dir.path(), "notes", "hello")?;

    assert_eq!(FileManager::detect_file_type(&json)?, FileType::Json);
    assert_eq!(FileManager::detect_file_type(&csv)?, FileType::Csv);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing")).is_err());

    Ok(())
}

/// write_to_file creates parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("export.csv");

    FileManager::write_to_file(&path, "english_word\n")?;

    assert_eq!(FileManager::read_bytes(&path)?, b"english_word\n");

    Ok(())
}
