/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use vocabport::app_config::Config;
use vocabport::app_controller::{Controller, ImportOptions};
use vocabport::errors::{ImportRejected, StoreError};
use vocabport::ingest::{DataFormat, ImportPolicy};
use vocabport::store::{AttemptType, WordUpdate};
use crate::common;

/// A clean file is stored in full
#[tokio::test]
async fn test_runImport_withValidCsv_shouldStoreAllWords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_csv(temp_dir.path(), "words.csv")?;
    let controller = common::in_memory_controller("alice")?;

    let imports = controller.run_import(&csv, ImportOptions::default()).await?;

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].format, DataFormat::Csv);
    assert_eq!(imports[0].stored, 2);
    assert_eq!(controller.show_stats().await?.total_words, 2);

    Ok(())
}

/// Errors block the import under the default policy
#[tokio::test]
async fn test_runImport_withErrorsAndBlockPolicy_shouldStoreNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "mixed.json",
        r#"[{"word": "cat", "meaning": "گربه"}, {"word": "dog"}]"#,
    )?;
    let controller = common::in_memory_controller("alice")?;

    let err = controller.run_import(&file, ImportOptions::default()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<ImportRejected>(),
        Some(&ImportRejected::ValidationFailed { error_count: 1 })
    );
    assert_eq!(controller.show_stats().await?.total_words, 0);

    Ok(())
}

/// Accept-valid keeps the good rows of a partially broken file
#[tokio::test]
async fn test_runImport_withAcceptValidPolicy_shouldStoreValidRows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "mixed.json",
        r#"[{"word": "cat", "meaning": "گربه"}, {"word": "dog"}]"#,
    )?;
    let controller = common::in_memory_controller("alice")?;
    let options = ImportOptions {
        policy: ImportPolicy::AcceptValid,
        ..ImportOptions::default()
    };

    let imports = controller.run_import(&file, options).await?;

    assert_eq!(imports[0].stored, 1);
    assert_eq!(imports[0].report.rejected_count(), 1);

    Ok(())
}

/// Dry runs validate without writing
#[tokio::test]
async fn test_runImport_withDryRun_shouldNotStore() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_csv(temp_dir.path(), "words.csv")?;
    let controller = common::in_memory_controller("alice")?;
    let options = ImportOptions {
        dry_run: true,
        ..ImportOptions::default()
    };

    let imports = controller.run_import(&csv, options).await?;

    assert_eq!(imports[0].report.accepted.len(), 2);
    assert_eq!(imports[0].stored, 0);
    assert_eq!(controller.show_stats().await?.total_words, 0);

    Ok(())
}

/// A directory import continues past a broken file
#[tokio::test]
async fn test_runImport_withDirectory_shouldSkipBrokenFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_csv(temp_dir.path(), "a.csv")?;
    common::create_test_file(temp_dir.path(), "b.json", r#"{"not": "an array"}"#)?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;
    let controller = common::in_memory_controller("alice")?;

    let imports = controller.run_import(temp_dir.path(), ImportOptions::default()).await?;

    assert_eq!(imports.len(), 1);
    assert!(imports[0].path.ends_with("a.csv"));

    Ok(())
}

/// A directory where every file fails is an error, not an empty success
#[tokio::test]
async fn test_runImport_withOnlyBrokenFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.json", r#"{"not": "an array"}"#)?;
    common::create_test_file(temp_dir.path(), "c.csv", "english_word,persian_meaning\n")?;
    let controller = common::in_memory_controller("alice")?;

    let err = controller.run_import(temp_dir.path(), ImportOptions::default()).await.unwrap_err();

    assert!(err.to_string().contains("All 2 file(s)"));
    assert_eq!(controller.show_stats().await?.total_words, 0);

    Ok(())
}

/// Files without a known extension are sniffed
#[tokio::test]
async fn test_importFile_withoutExtension_shouldDetectJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "words", r#"[{"english": "sky", "persian": "آسمان"}]"#)?;
    let controller = common::in_memory_controller("alice")?;

    let import = controller.import_file(&file, ImportOptions::default()).await?;

    assert_eq!(import.format, DataFormat::Json);
    assert_eq!(import.stored, 1);

    Ok(())
}

/// Exported words import back unchanged
#[tokio::test]
async fn test_export_thenImport_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_csv(temp_dir.path(), "words.csv")?;
    let source = common::in_memory_controller("alice")?;
    source.run_import(&csv, ImportOptions::default()).await?;

    let exported = source
        .run_export(Some(DataFormat::Json), Some(temp_dir.path().join("out.json")))
        .await?;

    let target = common::in_memory_controller("bob")?;
    let imports = target.run_import(&exported, ImportOptions::default()).await?;

    assert!(imports[0].report.errors.is_empty());
    assert_eq!(target.show_stats().await?, source.show_stats().await?);

    Ok(())
}

/// The template file imports cleanly
#[tokio::test]
async fn test_runTemplate_shouldWriteImportableFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::in_memory_controller("alice")?;

    let path = controller.run_template(Some(DataFormat::Csv), Some(temp_dir.path().join("t.csv")))?;
    let imports = controller.run_import(&path, ImportOptions::default()).await?;

    assert_eq!(imports[0].stored, 3);

    Ok(())
}

/// Practice answers update the counters
#[tokio::test]
async fn test_recordPractice_shouldUpdateStats() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_csv(temp_dir.path(), "words.csv")?;
    let controller = common::in_memory_controller("alice")?;
    controller.run_import(&csv, ImportOptions::default()).await?;

    let queue = controller.practice_queue(10).await?;
    assert_eq!(queue.len(), 2);

    let dog = queue.iter().find(|w| w.entry.english_word == "dog").unwrap();
    let updated = controller.record_practice(&dog.id, true, AttemptType::Quiz).await?;

    assert_eq!(updated.entry.total_attempts, 1);
    assert_eq!(updated.entry.correct_answers, 1);

    let stats = controller.show_stats().await?;
    assert_eq!(stats.total_attempts, 5);
    assert_eq!(stats.total_correct, 4);
    assert_eq!(stats.average_accuracy, 80);

    Ok(())
}

/// Commands that never touch the store leave the database file alone
#[tokio::test]
async fn test_withConfig_shouldOpenStoreOnFirstUse() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("data").join("words.db");
    let config = Config {
        database_path: Some(db_path.clone()),
        ..Config::default()
    };
    let controller = Controller::with_config(config);

    controller.run_template(Some(DataFormat::Json), Some(temp_dir.path().join("t.json")))?;
    assert!(!db_path.exists());

    assert_eq!(controller.show_stats().await?.total_words, 0);
    assert!(db_path.exists());

    Ok(())
}

/// Hand-entered words are trimmed, editable and deletable
#[tokio::test]
async fn test_addEditDelete_shouldGoThroughStore() -> Result<()> {
    let controller = common::in_memory_controller("alice")?;

    let added = controller
        .add_word(" window ", " پنجره ", vec!["Open the window".to_string(), "  ".to_string()])
        .await?;
    assert_eq!(added.entry.english_word, "window");
    assert_eq!(added.entry.meaning, "پنجره");
    assert_eq!(added.entry.example_sentences, vec!["Open the window"]);

    let edited = controller
        .edit_word(
            &added.id,
            WordUpdate {
                example_sentences: Some(vec!["Close the window".to_string()]),
                ..WordUpdate::default()
            },
        )
        .await?;
    assert_eq!(edited.entry.english_word, "window");
    assert_eq!(edited.entry.example_sentences, vec!["Close the window"]);
    assert!(controller.edit_word(&added.id, WordUpdate::default()).await.is_err());

    controller.delete_word(&added.id).await?;
    assert_eq!(controller.show_stats().await?.total_words, 0);

    let err = controller.delete_word(&added.id).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NotFound(_))));

    Ok(())
}

/// A blank meaning is refused and nothing is stored
#[tokio::test]
async fn test_addWord_withBlankMeaning_shouldFail() -> Result<()> {
    let controller = common::in_memory_controller("alice")?;

    let err = controller.add_word("chair", "   ", Vec::new()).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::InvalidWord(_))));
    assert_eq!(controller.show_stats().await?.total_words, 0);

    Ok(())
}

/// Quiz answers are checked loosely and counted as quiz attempts
#[tokio::test]
async fn test_answerQuiz_shouldCheckAnswerAndRecordAttempt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_csv(temp_dir.path(), "words.csv")?;
    let controller = common::in_memory_controller("alice")?;
    controller.run_import(&csv, ImportOptions::default()).await?;

    let questions = controller.quiz_questions(10, true).await?;
    assert_eq!(questions.len(), 2);
    let dog = questions.iter().find(|q| q.prompt == "dog").unwrap();
    let mut options = dog.options.clone();
    options.sort();
    assert_eq!(options, vec!["سگ", "گربه"]);

    let right = controller.answer_quiz(&dog.word_id, "  سگ ").await?;
    assert!(right.correct);
    assert_eq!(right.word.entry.total_attempts, 1);
    assert_eq!(right.word.entry.correct_answers, 1);

    let wrong = controller.answer_quiz(&dog.word_id, "گربه").await?;
    assert!(!wrong.correct);
    assert_eq!(wrong.expected, "سگ");
    assert_eq!(wrong.word.entry.total_attempts, 2);
    assert_eq!(wrong.word.entry.correct_answers, 1);

    assert!(controller.answer_quiz("missing", "x").await.is_err());
    assert_eq!(controller.quiz_questions(1, false).await?.len(), 1);

    Ok(())
}
