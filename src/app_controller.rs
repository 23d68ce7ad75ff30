use anyhow::{anyhow, Context, Result};
use chrono::{Local, Utc};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::app_config::Config;
use crate::errors::{FormatError, StoreError};
use crate::export;
use crate::file_utils::FileManager;
use crate::ingest::{DataFormat, ImportPolicy, IngestPipeline, IngestReport};
use crate::model::VocabularyEntry;
use crate::practice::{self, QuizQuestion, QuizResult};
use crate::store::{AttemptType, VocabularyStats, WordRecord, WordRepository, WordStore, WordUpdate};

// @module: Application controller for vocabulary import and practice

/// Per-run import settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    // @field: Declared format; detected from the file when unset
    pub format: Option<DataFormat>,
    // @field: Commit policy
    pub policy: ImportPolicy,
    // @field: Validate only, store nothing
    pub dry_run: bool,
}

/// Result of importing one file
#[derive(Debug, Clone)]
pub struct FileImport {
    pub path: PathBuf,
    pub format: DataFormat,
    pub report: IngestReport,
    /// Words written to the store
    pub stored: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Word persistence, opened on first use
    store: OnceCell<Arc<dyn WordStore>>,
}

impl Controller {
    // @method: Create a controller over the configured SQLite store
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    // @method: Create a controller over any store
    pub fn with_store(config: Config, store: Arc<dyn WordStore>) -> Self {
        Self {
            config,
            store: OnceCell::from(store),
        }
    }

    async fn store(&self) -> Result<&Arc<dyn WordStore>, StoreError> {
        self.store
            .get_or_try_init(|| async {
                let repository = match &self.config.database_path {
                    Some(path) => WordRepository::open(path)?,
                    None => WordRepository::new_default()?,
                };
                Ok::<Arc<dyn WordStore>, StoreError>(Arc::new(repository))
            })
            .await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import a file, or every .csv/.json file below a directory
    pub async fn run_import(&self, path: &Path, options: ImportOptions) -> Result<Vec<FileImport>> {
        if FileManager::dir_exists(path) {
            return self.run_folder(path, options).await;
        }

        if !FileManager::file_exists(path) {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }

        Ok(vec![self.import_file(path, options).await?])
    }

    /// Import one file
    pub async fn import_file(&self, path: &Path, options: ImportOptions) -> Result<FileImport> {
        let format = match options.format {
            Some(format) => format,
            None => FileManager::detect_file_type(path)?
                .data_format()
                .ok_or_else(|| FormatError::UnsupportedFileType(path.display().to_string()))?,
        };

        let bytes = FileManager::read_bytes(path)?;
        let pipeline = IngestPipeline::with_options(self.config.pipeline_options());
        let report = pipeline
            .ingest(&bytes, format)
            .with_context(|| format!("Failed to import {}", path.display()))?;

        for validation_error in &report.errors {
            warn!("{}", validation_error);
        }

        if options.dry_run {
            info!("Dry run: nothing stored for {}", path.display());
            return Ok(FileImport {
                path: path.to_path_buf(),
                format,
                report,
                stored: 0,
            });
        }

        let entries = report.entries_for_commit(options.policy)?;
        let stored = self.store().await?.insert_batch(&self.config.owner_id, entries).await?.len();
        info!("Success: {} word(s) imported from {}", stored, path.display());

        Ok(FileImport {
            path: path.to_path_buf(),
            format,
            report,
            stored,
        })
    }

    /// Import every file of a directory; one failing file does not stop the others
    pub async fn run_folder(&self, input_dir: &Path, options: ImportOptions) -> Result<Vec<FileImport>> {
        let files = FileManager::find_import_files(input_dir)?;

        if files.is_empty() {
            return Err(anyhow!("No CSV or JSON files found in directory: {:?}", input_dir));
        }

        let mut imports = Vec::with_capacity(files.len());
        let mut error_count = 0;

        for file in &files {
            match self.import_file(file, options).await {
                Ok(import) => imports.push(import),
                Err(e) => {
                    error!("Error processing file {}: {:#}", file.display(), e);
                    error_count += 1;
                }
            }
        }

        let stored: usize = imports.iter().map(|i| i.stored).sum();
        info!(
            "Folder import completed: {} file(s) processed, {} error(s), {} word(s) stored",
            imports.len(),
            error_count,
            stored
        );

        if imports.is_empty() && error_count > 0 {
            return Err(anyhow!(
                "All {} file(s) in {:?} failed to import",
                error_count,
                input_dir
            ));
        }

        Ok(imports)
    }

    /// Write the sample template and return where it went
    pub fn run_template(&self, format: Option<DataFormat>, output: Option<PathBuf>) -> Result<PathBuf> {
        let format = format.unwrap_or(self.config.export.format);
        let path = output.unwrap_or_else(|| PathBuf::from(export::template_filename(format)));

        let content = export::render_template(format).context("Failed to render template")?;
        FileManager::write_to_file(&path, &content)?;

        info!("Template written to {} ({})", path.display(), format.mime_type());
        Ok(path)
    }

    /// Export all words of the owner and return where they went
    pub async fn run_export(&self, format: Option<DataFormat>, output: Option<PathBuf>) -> Result<PathBuf> {
        let format = format.unwrap_or(self.config.export.format);
        let path = output.unwrap_or_else(|| {
            PathBuf::from(export::export_filename(format, Local::now().date_naive()))
        });

        let words = self.store().await?.list_words(&self.config.owner_id).await?;
        let entries: Vec<VocabularyEntry> = words.into_iter().map(|w| w.entry).collect();

        let content = export::render(&entries, format).context("Failed to render export")?;
        FileManager::write_to_file(&path, &content)?;

        info!("Exported {} word(s) to {}", entries.len(), path.display());
        Ok(path)
    }

    /// Statistics for the configured owner
    pub async fn show_stats(&self) -> Result<VocabularyStats> {
        let stats = self.store().await?.stats(&self.config.owner_id).await?;

        info!(
            "Words: {} - Attempts: {} - Correct: {} - Accuracy: {}%",
            stats.total_words, stats.total_attempts, stats.total_correct, stats.average_accuracy
        );
        Ok(stats)
    }

    /// Words due for review
    pub async fn practice_queue(&self, limit: usize) -> Result<Vec<WordRecord>> {
        let words = self.store().await?.practice_queue(&self.config.owner_id, limit).await?;
        debug!("{} word(s) in practice queue", words.len());
        Ok(words)
    }

    /// Record one practice answer
    pub async fn record_practice(
        &self,
        word_id: &str,
        is_correct: bool,
        attempt_type: AttemptType,
    ) -> Result<WordRecord> {
        let record = self
            .store()
            .await?
            .record_attempt(&self.config.owner_id, word_id, is_correct, attempt_type)
            .await?;

        info!(
            "{}: {}/{} correct ({}%)",
            record.entry.english_word,
            record.entry.correct_answers,
            record.entry.total_attempts,
            record.entry.accuracy()
        );
        Ok(record)
    }

    /// Add one word typed in by hand
    pub async fn add_word(&self, english_word: &str, meaning: &str, example_sentences: Vec<String>) -> Result<WordRecord> {
        let mut entry = VocabularyEntry::new(english_word, meaning, Utc::now());
        entry.example_sentences = example_sentences;

        let record = self.store().await?.add_word(&self.config.owner_id, entry).await?;
        info!("Added {} ({})", record.entry.english_word, record.id);
        Ok(record)
    }

    /// Change the text of a stored word
    pub async fn edit_word(&self, word_id: &str, update: WordUpdate) -> Result<WordRecord> {
        if update.is_empty() {
            return Err(anyhow!("Nothing to change for word {}", word_id));
        }

        let record = self
            .store()
            .await?
            .update_word(&self.config.owner_id, word_id, update)
            .await?;
        info!("Updated {} ({})", record.entry.english_word, record.id);
        Ok(record)
    }

    /// Delete a stored word with its practice history
    pub async fn delete_word(&self, word_id: &str) -> Result<()> {
        self.store().await?.delete_word(&self.config.owner_id, word_id).await?;
        info!("Deleted word {}", word_id);
        Ok(())
    }

    /// Questions over the owner's words in random order
    pub async fn quiz_questions(&self, limit: usize, multiple_choice: bool) -> Result<Vec<QuizQuestion>> {
        let words = self.store().await?.list_words(&self.config.owner_id).await?;
        if words.is_empty() {
            return Err(anyhow!("No words to quiz on; import or add some first"));
        }

        let mut questions = practice::build_quiz(&words, multiple_choice, &mut rand::rng());
        questions.truncate(limit);
        debug!("{} quiz question(s) built from {} word(s)", questions.len(), words.len());
        Ok(questions)
    }

    /// Check a quiz answer and record it as a quiz attempt
    pub async fn answer_quiz(&self, word_id: &str, answer: &str) -> Result<QuizResult> {
        let store = self.store().await?;
        let word = store
            .get_word(&self.config.owner_id, word_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(word_id.to_string()))?;

        let correct = practice::check_answer(&word.entry.meaning, answer);
        let word = self.record_practice(word_id, correct, AttemptType::Quiz).await?;

        if correct {
            info!("Correct: {} = {}", word.entry.english_word, word.entry.meaning);
        } else {
            warn!("Wrong: {} = {}, not {}", word.entry.english_word, word.entry.meaning, answer.trim());
        }

        Ok(QuizResult {
            correct,
            expected: word.entry.meaning.clone(),
            word,
        })
    }
}
