/*!
 * Quiz questions and answer checking.
 *
 * A question asks for the Persian meaning of an English word. Typed answers
 * are compared after trimming and lowercasing; multiple-choice questions
 * offer the right meaning next to up to three meanings of other words.
 */

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::store::WordRecord;

/// Wrong options offered next to the right one
pub const WRONG_OPTIONS: usize = 3;

/// One quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub word_id: String,
    /// English word shown to the learner
    pub prompt: String,
    /// Shuffled choices, empty for typed answers
    pub options: Vec<String>,
}

/// Outcome of answering a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: bool,
    pub expected: String,
    /// Word with its counters after the attempt
    pub word: WordRecord,
}

/// Whether `given` matches `expected`, ignoring case and surrounding spaces
pub fn check_answer(expected: &str, given: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Choices for `target`: its meaning plus up to [`WRONG_OPTIONS`] distinct meanings of the other words
pub fn quiz_options<R: Rng + ?Sized>(target: &WordRecord, pool: &[WordRecord], rng: &mut R) -> Vec<String> {
    let right = target.entry.meaning.clone();

    let mut wrong: Vec<&str> = pool
        .iter()
        .filter(|word| word.id != target.id)
        .map(|word| word.entry.meaning.as_str())
        .filter(|meaning| !check_answer(&right, meaning))
        .collect();
    wrong.sort_unstable();
    wrong.dedup();
    wrong.shuffle(rng);

    let mut options: Vec<String> = wrong.into_iter().take(WRONG_OPTIONS).map(str::to_string).collect();
    options.push(right);
    options.shuffle(rng);
    options
}

/// One question per word in random order, with choices when `multiple_choice` is set
pub fn build_quiz<R: Rng + ?Sized>(words: &[WordRecord], multiple_choice: bool, rng: &mut R) -> Vec<QuizQuestion> {
    let mut order: Vec<&WordRecord> = words.iter().collect();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|word| QuizQuestion {
            word_id: word.id.clone(),
            prompt: word.entry.english_word.clone(),
            options: if multiple_choice {
                quiz_options(word, words, rng)
            } else {
                Vec::new()
            },
        })
        .collect()
}
