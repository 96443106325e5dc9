//! Word lists
//!
//! Embedded answer and guess lists, plus the [`WordSource`] seam the game
//! session uses to pick the daily answer and validate guesses.

mod embedded;
pub mod loader;

pub use embedded::{ALLOWED, ALLOWED_COUNT, ANSWERS, ANSWERS_COUNT};

use crate::core::Word;
use crate::game::{GameDate, answer_for_date};
use rustc_hash::FxHashSet;
use std::fmt;

/// Supplies the daily answer and the guess dictionary
pub trait WordSource {
    /// The answer for `date`; must be stable for a given date
    fn answer_for(&self, date: GameDate) -> Word;

    /// Whether `word` is an accepted guess
    fn is_valid_guess(&self, word: &str) -> bool;
}

/// Error type for unusable word lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    NoAnswers,
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAnswers => write!(f, "Answer list is empty"),
        }
    }
}

impl std::error::Error for WordListError {}

/// Answer list plus accepted-guess set
#[derive(Debug, Clone)]
pub struct Dictionary {
    answers: Vec<Word>,
    allowed: FxHashSet<String>,
}

impl Dictionary {
    /// # Errors
    /// Returns `WordListError::NoAnswers` if `answers` is empty.
    pub fn new(
        answers: Vec<Word>,
        allowed: impl IntoIterator<Item = Word>,
    ) -> Result<Self, WordListError> {
        if answers.is_empty() {
            return Err(WordListError::NoAnswers);
        }
        let allowed = allowed.into_iter().map(|w| w.to_string()).collect();
        Ok(Self { answers, allowed })
    }

    /// The lists compiled into the binary
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            answers: loader::words_from_slice(ANSWERS),
            allowed: ALLOWED.iter().map(|&w| w.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    #[must_use]
    pub fn allowed_len(&self) -> usize {
        self.allowed.len()
    }

    /// Random answer for practice games
    #[must_use]
    pub fn random_answer(&self) -> Word {
        use rand::prelude::IndexedRandom;

        self.answers
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| self.answers[0].clone())
    }

    /// Whether `word` is in the accepted-guess set (case-insensitive)
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.allowed.contains(&word.to_ascii_lowercase())
    }
}

impl WordSource for Dictionary {
    fn answer_for(&self, date: GameDate) -> Word {
        // `answers` is non-empty by construction
        answer_for_date(date, &self.answers)
            .cloned()
            .unwrap_or_else(|| self.answers[0].clone())
    }

    fn is_valid_guess(&self, word: &str) -> bool {
        self.contains(word)
    }
}
