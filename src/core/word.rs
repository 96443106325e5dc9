//! Five-letter words
//!
//! Guesses and answers share this representation; construction validates
//! length and alphabet once so the evaluator can index bytes freely.

use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Number of letters per word (and tiles per row)
pub const WORD_LENGTH: usize = 5;

/// A validated, lowercase five-letter word
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    letters: [u8; WORD_LENGTH],
}

/// Error type for invalid words
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    InvalidLength(usize),
    NonAscii,
    InvalidCharacters,
}

impl fmt::Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "Word must be exactly {WORD_LENGTH} letters, got {len}")
            }
            Self::NonAscii => write!(f, "Word must contain only ASCII letters"),
            Self::InvalidCharacters => write!(f, "Word contains invalid characters"),
        }
    }
}

impl std::error::Error for WordError {}

impl Word {
    /// Create a word, normalizing to lowercase
    ///
    /// # Errors
    /// Returns `WordError` if the text is not exactly five ASCII letters.
    ///
    /// # Examples
    /// ```
    /// use wordle_chain::core::Word;
    ///
    /// let word = Word::new("Crane").unwrap();
    /// assert_eq!(word.as_str(), "crane");
    ///
    /// assert!(Word::new("cranes").is_err());
    /// assert!(Word::new("cr4ne").is_err());
    /// ```
    pub fn new(text: &str) -> Result<Self, WordError> {
        if !text.is_ascii() {
            return Err(WordError::NonAscii);
        }

        let bytes = text.as_bytes();
        let letters: [u8; WORD_LENGTH] = bytes
            .try_into()
            .map_err(|_| WordError::InvalidLength(bytes.len()))?;

        if !letters.iter().all(u8::is_ascii_alphabetic) {
            return Err(WordError::InvalidCharacters);
        }

        Ok(Self {
            letters: letters.map(|b| b.to_ascii_lowercase()),
        })
    }

    /// Build a word from tile letters; `None` if any slot is empty
    pub(crate) fn from_slots(slots: [Option<u8>; WORD_LENGTH]) -> Option<Self> {
        let mut letters = [0u8; WORD_LENGTH];
        for (dst, slot) in letters.iter_mut().zip(slots) {
            *dst = slot?.to_ascii_lowercase();
        }
        letters
            .iter()
            .all(u8::is_ascii_lowercase)
            .then_some(Self { letters })
    }

    /// The word as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII
        std::str::from_utf8(&self.letters).unwrap_or_default()
    }

    /// The word as bytes
    #[inline]
    #[must_use]
    pub const fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.letters
    }

    /// Letter at `position` (0-4)
    ///
    /// # Panics
    /// Panics if position >= 5
    #[inline]
    #[must_use]
    pub const fn letter_at(&self, position: usize) -> u8 {
        self.letters[position]
    }

    /// Whether the word contains `letter`
    #[inline]
    #[must_use]
    pub fn contains(&self, letter: u8) -> bool {
        self.letters.contains(&letter)
    }

    /// How many times each letter occurs
    ///
    /// This is the starting pool for duplicate-safe evaluation.
    pub(crate) fn letter_counts(&self) -> FxHashMap<u8, u8> {
        let mut counts = FxHashMap::default();
        for &ch in &self.letters {
            *counts.entry(ch).or_insert(0) += 1;
        }
        counts
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_creation_valid() {
        let word = Word::new("crane").unwrap();
        assert_eq!(word.as_str(), "crane");
        assert_eq!(word.letters(), b"crane");
    }

    #[test]
    fn word_creation_uppercase_normalized() {
        assert_eq!(Word::new("CRANE").unwrap().as_str(), "crane");
        assert_eq!(Word::new("CrAnE").unwrap(), Word::new("crane").unwrap());
    }

    #[test]
    fn word_creation_invalid_length() {
        assert_eq!(Word::new("too long"), Err(WordError::InvalidLength(8)));
        assert_eq!(Word::new("shrt"), Err(WordError::InvalidLength(4)));
        assert_eq!(Word::new(""), Err(WordError::InvalidLength(0)));
    }

    #[test]
    fn word_creation_invalid_characters() {
        assert_eq!(Word::new("cran3"), Err(WordError::InvalidCharacters));
        assert_eq!(Word::new("cran "), Err(WordError::InvalidCharacters));
        assert_eq!(Word::new("crâne"), Err(WordError::NonAscii));
    }

    #[test]
    fn from_slots_requires_every_letter() {
        let full = [Some(b'c'), Some(b'r'), Some(b'a'), Some(b'n'), Some(b'e')];
        assert_eq!(Word::from_slots(full).unwrap().as_str(), "crane");

        let gap = [Some(b'c'), Some(b'r'), None, Some(b'n'), Some(b'e')];
        assert!(Word::from_slots(gap).is_none());
    }

    #[test]
    fn letter_counts_with_duplicates() {
        let counts = Word::new("allot").unwrap().letter_counts();
        assert_eq!(counts.get(&b'l'), Some(&2));
        assert_eq!(counts.get(&b'a'), Some(&1));
        assert_eq!(counts.get(&b'z'), None);
    }

    #[test]
    fn parse_trims_whitespace() {
        let word: Word = " slate\n".parse().unwrap();
        assert_eq!(word.to_string(), "slate");
    }
}
