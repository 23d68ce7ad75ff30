// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use vocabport::app_config::{self, Config};
use vocabport::app_controller::{Controller, ImportOptions};
use vocabport::ingest::{CsvMode, DataFormat, ImportPolicy};
use vocabport::store::{AttemptType, WordUpdate};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for DataFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Csv,
    Json,
}

impl From<CliFormat> for DataFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Csv => DataFormat::Csv,
            CliFormat::Json => DataFormat::Json,
        }
    }
}

/// CLI Wrapper for ImportPolicy to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPolicy {
    /// Refuse the import while any row has errors
    BlockOnErrors,
    /// Import the valid rows and skip the rest
    AcceptValid,
}

impl From<CliPolicy> for ImportPolicy {
    fn from(cli_policy: CliPolicy) -> Self {
        match cli_policy {
            CliPolicy::BlockOnErrors => ImportPolicy::BlockOnErrors,
            CliPolicy::AcceptValid => ImportPolicy::AcceptValid,
        }
    }
}

/// CLI Wrapper for CsvMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCsvMode {
    Naive,
    QuoteAware,
}

impl From<CliCsvMode> for CsvMode {
    fn from(cli_mode: CliCsvMode) -> Self {
        match cli_mode {
            CliCsvMode::Naive => CsvMode::Naive,
            CliCsvMode::QuoteAware => CsvMode::QuoteAware,
        }
    }
}

/// CLI Wrapper for AttemptType to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAttemptType {
    Flashcard,
    Quiz,
}

impl From<CliAttemptType> for AttemptType {
    fn from(cli_type: CliAttemptType) -> Self {
        match cli_type {
            CliAttemptType::Flashcard => AttemptType::Flashcard,
            CliAttemptType::Quiz => AttemptType::Quiz,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import vocabulary from a CSV/JSON file or a directory of them
    Import(ImportArgs),

    /// Write a sample file showing the expected layout
    Template(OutputArgs),

    /// Export all stored words
    Export(OutputArgs),

    /// Show practice statistics
    Stats,

    /// Record a practice answer, or list words due for review
    Practice(PracticeArgs),

    /// Add one word by hand
    Add(AddArgs),

    /// Change the text of a stored word
    Edit(EditArgs),

    /// Delete a stored word and its practice history
    Delete {
        /// Word to delete
        #[arg(value_name = "WORD_ID")]
        word_id: String,
    },

    /// Answer a quiz question, or list questions to answer
    Quiz(QuizArgs),

    /// Generate shell completions for vocabport
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Input file or directory to import
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// File format (detected from the extension or content when omitted)
    #[arg(short, long, value_enum)]
    format: Option<CliFormat>,

    /// What to do when some rows have errors
    #[arg(short, long, value_enum)]
    policy: Option<CliPolicy>,

    /// CSV tokenizer
    #[arg(long, value_enum)]
    csv_mode: Option<CliCsvMode>,

    /// Validate only, store nothing
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliFormat>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PracticeArgs {
    /// Word to record an answer for; lists the review queue when omitted
    #[arg(value_name = "WORD_ID")]
    word_id: Option<String>,

    /// The answer was correct
    #[arg(long, conflicts_with = "incorrect", requires = "word_id")]
    correct: bool,

    /// The answer was wrong
    #[arg(long, requires = "word_id")]
    incorrect: bool,

    /// How the word was practiced
    #[arg(short, long, value_enum, default_value = "flashcard")]
    mode: CliAttemptType,

    /// Number of words to list
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug)]
struct AddArgs {
    /// English word
    english_word: String,

    /// Persian meaning
    meaning: String,

    /// Example sentence; repeat for more
    #[arg(short, long = "sentence")]
    sentences: Vec<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Word to change
    #[arg(value_name = "WORD_ID")]
    word_id: String,

    /// New English word
    #[arg(long)]
    word: Option<String>,

    /// New Persian meaning
    #[arg(long)]
    meaning: Option<String>,

    /// Replacement example sentence; repeat for more
    #[arg(short, long = "sentence")]
    sentences: Vec<String>,

    /// Remove all example sentences
    #[arg(long, conflicts_with = "sentences")]
    clear_sentences: bool,
}

impl EditArgs {
    fn into_update(self) -> WordUpdate {
        let example_sentences = if self.clear_sentences {
            Some(Vec::new())
        } else if self.sentences.is_empty() {
            None
        } else {
            Some(self.sentences)
        };

        WordUpdate {
            english_word: self.word,
            meaning: self.meaning,
            example_sentences,
        }
    }
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Word the answer is for; lists questions when omitted
    #[arg(value_name = "WORD_ID")]
    word_id: Option<String>,

    /// Your answer
    #[arg(value_name = "ANSWER", requires = "word_id")]
    answer: Option<String>,

    /// Offer multiple-choice options when listing
    #[arg(long)]
    choices: bool,

    /// Number of questions to list
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

/// vocabport - vocabulary import and practice tool
///
/// Imports English/Persian vocabulary lists from CSV or JSON files, reports
/// every problem row by row, and stores the accepted words for practice.
#[derive(Parser, Debug)]
#[command(name = "vocabport")]
#[command(version)]
#[command(about = "Vocabulary import, export and practice tool")]
#[command(long_about = "vocabport validates vocabulary files and stores the words for practice.

EXAMPLES:
    vocabport template -f csv                   # Write vocabulary_template.csv
    vocabport import words.csv                  # Import, refusing files with errors
    vocabport import -p accept-valid words.json # Import only the valid rows
    vocabport import -n lists/                  # Validate a whole directory
    vocabport export -f json                    # Export all words
    vocabport practice <WORD_ID> --correct      # Record a correct answer
    vocabport add book کتاب -s 'I read a book'  # Add one word
    vocabport quiz --choices                    # List multiple-choice questions
    vocabport quiz <WORD_ID> کتاب               # Check an answer
    vocabport completions bash > vocabport.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Owner whose words are read and written
    #[arg(long, global = true, env = "VOCABPORT_OWNER")]
    owner: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Records are filtered by the global max level, which is adjusted after config load
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vocabport", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cli_level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(cli_level).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;

    match cli.log_level {
        Some(cli_level) => config.log_level = cli_level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    if let Some(owner) = &cli.owner {
        config.owner_id = owner.clone();
    }

    if let Commands::Import(args) = &cli.command {
        if let Some(csv_mode) = args.csv_mode {
            config.import.csv_mode = csv_mode.into();
        }
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // The word store is opened by the first command that needs it
    let controller = Controller::with_config(config);

    if let Err(e) = run_command(&controller, cli.command).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Import(args) => {
            let options = ImportOptions {
                format: args.format.map(Into::into),
                policy: args
                    .policy
                    .map(Into::into)
                    .unwrap_or(controller.config().import.policy),
                dry_run: args.dry_run,
            };

            let imports = controller.run_import(&args.input_path, options).await?;
            for import in &imports {
                info!("{}: {}", import.path.display(), import.report.summary());
            }
        }
        Commands::Template(args) => {
            controller.run_template(args.format.map(Into::into), args.output)?;
        }
        Commands::Export(args) => {
            controller.run_export(args.format.map(Into::into), args.output).await?;
        }
        Commands::Stats => {
            controller.show_stats().await?;
        }
        Commands::Practice(args) => match args.word_id {
            Some(word_id) => {
                if !args.correct && !args.incorrect {
                    return Err(anyhow!("Pass --correct or --incorrect to record an answer"));
                }
                controller
                    .record_practice(&word_id, args.correct, args.mode.into())
                    .await?;
            }
            None => {
                for word in controller.practice_queue(args.limit).await? {
                    println!("{}\t{}\t{}", word.id, word.entry.english_word, word.entry.meaning);
                }
            }
        },
        Commands::Add(args) => {
            let record = controller
                .add_word(&args.english_word, &args.meaning, args.sentences)
                .await?;
            println!("{}", record.id);
        }
        Commands::Edit(args) => {
            let word_id = args.word_id.clone();
            controller.edit_word(&word_id, args.into_update()).await?;
        }
        Commands::Delete { word_id } => {
            controller.delete_word(&word_id).await?;
        }
        Commands::Quiz(args) => match (args.word_id, args.answer) {
            (Some(word_id), Some(answer)) => {
                let result = controller.answer_quiz(&word_id, &answer).await?;
                if !result.correct {
                    println!("{}", result.expected);
                }
            }
            (Some(_), None) => return Err(anyhow!("Give an answer after the word id")),
            _ => {
                for question in controller.quiz_questions(args.limit, args.choices).await? {
                    println!("{}\t{}\t{}", question.word_id, question.prompt, question.options.join(" | "));
                }
            }
        },
        Commands::Completions { .. } => {}
    }

    Ok(())
}
