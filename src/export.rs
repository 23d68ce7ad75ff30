use chrono::{NaiveDate, TimeZone, Utc};

use crate::ingest::{DataFormat, Field};
use crate::model::VocabularyEntry;

// @module: Template and export rendering

fn sample(
    word: &str,
    meaning: &str,
    examples: [&str; 2],
    total_attempts: u32,
    correct_answers: u32,
    created_at: (i32, u32, u32, u32, u32),
) -> VocabularyEntry {
    let (year, month, day, hour, minute) = created_at;
    VocabularyEntry {
        english_word: word.to_string(),
        meaning: meaning.to_string(),
        example_sentences: examples.iter().map(|s| s.to_string()).collect(),
        total_attempts,
        correct_answers,
        created_at: Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// Sample rows offered as a downloadable starting point
pub fn template_entries() -> Vec<VocabularyEntry> {
    vec![
        sample("hello", "سلام", ["Hello world", "Hello there"], 5, 4, (2024, 1, 15, 10, 30)),
        sample("goodbye", "خداحافظ", ["Goodbye friend", "See you later"], 3, 2, (2024, 1, 16, 14, 20)),
        sample(
            "thank you",
            "متشکرم",
            ["Thank you very much", "Thanks for your help"],
            8,
            7,
            (2024, 1, 17, 9, 15),
        ),
    ]
}

/// Render entries as CSV or JSON text.
///
/// CSV cells holding text are wrapped in double quotes verbatim, with no
/// escaping; a value containing a comma will not survive a naive re-import.
pub fn render(entries: &[VocabularyEntry], format: DataFormat) -> serde_json::Result<String> {
    match format {
        DataFormat::Csv => Ok(render_csv(entries)),
        DataFormat::Json => serde_json::to_string_pretty(entries),
    }
}

/// Render the sample template
pub fn render_template(format: DataFormat) -> serde_json::Result<String> {
    render(&template_entries(), format)
}

fn render_csv(entries: &[VocabularyEntry]) -> String {
    let header = Field::ALL.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(",");

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(header);
    for entry in entries {
        lines.push(format!(
            "\"{}\",\"{}\",\"{}\",{},{},{}",
            entry.english_word,
            entry.meaning,
            entry.example_sentences.join(";"),
            entry.total_attempts,
            entry.correct_answers,
            entry.created_at_iso()
        ));
    }
    lines.join("\n")
}

/// File name for the downloadable template
pub fn template_filename(format: DataFormat) -> String {
    format!("vocabulary_template.{}", format.extension())
}

/// File name for an export taken on the given day
pub fn export_filename(format: DataFormat, date: NaiveDate) -> String {
    format!("vocabulary_export_{}.{}", date.format("%Y-%m-%d"), format.extension())
}
