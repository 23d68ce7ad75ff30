/*!
 * Pipeline-level properties and reference scenarios
 */

use vocabport::errors::FormatError;
use vocabport::ingest::{CsvMode, DataFormat, Field, IngestPipeline, PipelineOptions};
use vocabport::model::VocabularyEntry;
use crate::common;

fn ingest_csv(text: &str) -> vocabport::IngestReport {
    IngestPipeline::new()
        .ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now())
        .unwrap()
}

fn ingest_json(text: &str) -> vocabport::IngestReport {
    IngestPipeline::new()
        .ingest_at(text.as_bytes(), DataFormat::Json, common::fixed_now())
        .unwrap()
}

/// Rows missing a required field never reach `accepted`
#[test]
fn test_requiredFieldGate_withBlankWordOrMeaning_shouldRejectRow() {
    let report = ingest_csv(
        "english_word,persian_meaning\n\
         cat,گربه\n\
         \"   \",سگ\n\
         bird,\n",
    );

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].english_word, "cat");

    assert!(report.errors_for_row(2).iter().any(|e| e.field == Field::EnglishWord));
    assert!(report.errors_for_row(3).iter().any(|e| e.field == Field::PersianMeaning));
    assert!(report.errors_for_row(1).is_empty());
}

/// Cross-field failures are reported but do not drop the row
#[test]
fn test_crossField_withTooManyCorrect_shouldReportAndStillAccept() {
    let report = ingest_json(
        r#"[
            {"english_word": "sun", "persian_meaning": "خورشید", "total_attempts": 2, "correct_answers": 3},
            {"english_word": "moon", "persian_meaning": "ماه", "total_attempts": 3, "correct_answers": 3}
        ]"#,
    );

    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 1);
    assert_eq!(report.errors[0].field, Field::CorrectAnswers);
}

/// Alias spellings normalize to the same entry
#[test]
fn test_aliases_withShortNames_shouldMatchCanonicalNames() {
    let short = ingest_json(r#"[{"english": "cat", "persian": "گربه"}]"#);
    let canonical = ingest_json(r#"[{"english_word": "cat", "persian_meaning": "گربه"}]"#);
    let shortest = ingest_json(r#"[{"word": "cat", "meaning": "گربه"}]"#);

    assert!(short.errors.is_empty());
    assert_eq!(short.accepted, canonical.accepted);
    assert_eq!(shortest.accepted, canonical.accepted);
}

/// Byte-identical input gives identical output
#[test]
fn test_ingest_calledTwice_shouldBeIdempotent() {
    let text = "word,meaning,total_attempts,correct_answers,created_at\n\
                a,الف,x,1,2024-01-01\n\
                b,ب,3,4,not-a-date\n\
                ,ج,1,1,\n";
    let pipeline = IngestPipeline::new();

    let first = pipeline.ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now()).unwrap();
    let second = pipeline.ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now()).unwrap();

    assert_eq!(first, second);
}

/// File-level problems abort before any row is processed
#[test]
fn test_formatPrecondition_shouldRaiseFormatError() {
    let pipeline = IngestPipeline::new();

    let object_root = pipeline.ingest(br#"{"english_word": "cat"}"#, DataFormat::Json);
    assert_eq!(object_root.unwrap_err(), FormatError::NotAnArray);

    let header_only = pipeline.ingest(b"english_word,persian_meaning\n", DataFormat::Csv);
    assert_eq!(header_only.unwrap_err(), FormatError::MissingRows);

    let broken = pipeline.ingest(b"[{\"english_word\": ", DataFormat::Json);
    assert!(matches!(broken.unwrap_err(), FormatError::Json(_)));
}

/// Header `english_word,persian_meaning,total_attempts,correct_answers`, row `hello,سلام,5,10`
#[test]
fn test_scenarioA_correctAboveTotal_shouldAcceptWithOneError() {
    let report = ingest_csv(
        "english_word,persian_meaning,total_attempts,correct_answers\n\
         hello,سلام,5,10\n",
    );

    let mut expected = VocabularyEntry::new("hello", "سلام", common::fixed_now());
    expected.total_attempts = 5;
    expected.correct_answers = 10;

    assert_eq!(report.accepted, vec![expected]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 1);
    assert_eq!(report.errors[0].field, Field::CorrectAnswers);
    assert!(report.errors[0].message.contains("cannot be greater than total attempts"));
}

/// `[{"word":"dog"}]` has no meaning
#[test]
fn test_scenarioB_missingMeaning_shouldRejectRow() {
    let report = ingest_json(r#"[{"word":"dog"}]"#);

    assert!(report.accepted.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 1);
    assert_eq!(report.errors[0].field, Field::PersianMeaning);
}

/// Semicolon-separated sentences are split and trimmed
#[test]
fn test_scenarioC_exampleSentences_shouldSplitOnSemicolon() {
    let report = ingest_csv(
        "english_word,persian_meaning,example_sentences\n\
         hi,سلام,\"Hi there;Good morning\"\n",
    );

    assert_eq!(report.accepted[0].example_sentences, vec!["Hi there", "Good morning"]);
}

/// Parallel validation keeps row numbering and order
#[test]
fn test_largeFile_withParallelValidation_shouldMatchSequential() {
    let mut text = String::from("english_word,persian_meaning,total_attempts,correct_answers\n");
    for i in 0..300 {
        if i % 7 == 0 {
            text.push_str(&format!(",m{},1,1\n", i));
        } else {
            text.push_str(&format!("w{},m{},1,{}\n", i, i, i % 3));
        }
    }

    let sequential = IngestPipeline::new()
        .ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now())
        .unwrap();
    let parallel = IngestPipeline::with_options(PipelineOptions {
        csv_mode: CsvMode::Naive,
        parallel_threshold: 1,
    })
    .ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now())
    .unwrap();

    assert_eq!(parallel, sequential);
    let rows: Vec<usize> = parallel.errors.iter().map(|e| e.row).collect();
    let mut sorted = rows.clone();
    sorted.sort();
    assert_eq!(rows, sorted);
}

/// Quote-aware mode keeps commas inside quoted cells
#[test]
fn test_quoteAwareMode_withEmbeddedComma_shouldKeepCell() {
    let text = "english_word,persian_meaning,example_sentences\n\
                \"well\",\"خوب\",\"Well, well;Oh well\"\n";
    let pipeline = IngestPipeline::with_options(PipelineOptions {
        csv_mode: CsvMode::QuoteAware,
        ..PipelineOptions::default()
    });

    let report = pipeline.ingest_at(text.as_bytes(), DataFormat::Csv, common::fixed_now()).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.accepted[0].example_sentences, vec!["Well, well", "Oh well"]);
}
