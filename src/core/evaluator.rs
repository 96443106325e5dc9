//! Round evaluation
//!
//! Computes the per-letter feedback for a guess against the answer,
//! following Wordle's duplicate-letter rule.

use super::tile::TileState;
use super::word::{WORD_LENGTH, Word};
use std::fmt;
use std::str::FromStr;

/// Feedback for one evaluated row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowFeedback([TileState; WORD_LENGTH]);

impl RowFeedback {
    /// All greens (the winning row)
    pub const PERFECT: Self = Self([TileState::Correct; WORD_LENGTH]);

    #[inline]
    #[must_use]
    pub const fn new(states: [TileState; WORD_LENGTH]) -> Self {
        Self(states)
    }

    /// The five states in column order
    #[inline]
    #[must_use]
    pub const fn states(&self) -> &[TileState; WORD_LENGTH] {
        &self.0
    }

    /// Whether every tile is correct
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.0.iter().all(|&s| s == TileState::Correct)
    }

    #[must_use]
    pub fn count(&self, state: TileState) -> usize {
        self.0.iter().filter(|&&s| s == state).count()
    }

    /// Evaluate `guess` against `answer`
    ///
    /// # Algorithm
    /// 1. First pass: exact matches are `Correct` and leave the letter pool
    /// 2. Second pass: remaining letters found in the pool are `Present`
    ///    (consuming one instance), everything else is `Absent`
    ///
    /// The greens must be taken before any yellow is handed out, otherwise a
    /// repeated guess letter could claim an instance that belongs to a green.
    ///
    /// # Examples
    /// ```
    /// use wordle_chain::core::{RowFeedback, Word};
    ///
    /// let guess = Word::new("crane").unwrap();
    /// let answer = Word::new("slate").unwrap();
    /// let feedback = RowFeedback::evaluate(&guess, &answer);
    ///
    /// assert_eq!(feedback.to_code(), "XXGXG");
    /// ```
    #[must_use]
    pub fn evaluate(guess: &Word, answer: &Word) -> Self {
        let mut result = [TileState::Initial; WORD_LENGTH];
        let mut pool = answer.letter_counts();

        // First pass: greens
        // Allow: Index needed to compare guess[i] with answer[i] and set result[i]
        #[allow(clippy::needless_range_loop)]
        for i in 0..WORD_LENGTH {
            let letter = guess.letter_at(i);
            if letter == answer.letter_at(i) {
                result[i] = TileState::Correct;
                if let Some(count) = pool.get_mut(&letter) {
                    *count = count.saturating_sub(1);
                }
            }
        }

        // Second pass: yellows from what is left
        for (i, state) in result.iter_mut().enumerate() {
            if *state == TileState::Correct {
                continue;
            }
            let letter = guess.letter_at(i);
            *state = match pool.get_mut(&letter) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    TileState::Present
                }
                _ => TileState::Absent,
            };
        }

        Self(result)
    }

    /// Encode as `G`/`Y`/`X`
    #[must_use]
    pub fn to_code(&self) -> String {
        self.0.iter().map(|s| s.code()).collect()
    }

    /// Render as emoji squares
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|s| s.emoji()).collect()
    }
}

/// Free-function form of [`RowFeedback::evaluate`]
#[must_use]
pub fn evaluate(guess: &Word, answer: &Word) -> [TileState; WORD_LENGTH] {
    *RowFeedback::evaluate(guess, answer).states()
}

impl From<RowFeedback> for [TileState; WORD_LENGTH] {
    fn from(feedback: RowFeedback) -> Self {
        feedback.0
    }
}

impl fmt::Display for RowFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}

/// Parse a row like "GYXXG" (`-`/`_` and emoji squares also accepted)
impl FromStr for RowFeedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != WORD_LENGTH {
            return Err(format!("Invalid feedback string: {s}"));
        }

        let mut states = [TileState::Initial; WORD_LENGTH];
        for (state, ch) in states.iter_mut().zip(chars) {
            *state = match ch {
                'G' | 'g' | '🟩' => TileState::Correct,
                'Y' | 'y' | '🟨' => TileState::Present,
                'X' | 'x' | '-' | '_' | '⬛' | '⬜' => TileState::Absent,
                _ => return Err(format!("Invalid feedback string: {s}")),
            };
        }
        Ok(Self(states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TileState::{Absent, Correct, Present};

    fn eval(guess: &str, answer: &str) -> [TileState; WORD_LENGTH] {
        evaluate(&Word::new(guess).unwrap(), &Word::new(answer).unwrap())
    }

    #[test]
    fn all_absent() {
        assert_eq!(eval("abcde", "fghij"), [Absent; 5]);
    }

    #[test]
    fn all_correct() {
        let word = Word::new("crane").unwrap();
        let feedback = RowFeedback::evaluate(&word, &word);
        assert_eq!(feedback, RowFeedback::PERFECT);
        assert!(feedback.is_win());
    }

    #[test]
    fn golden_allot_lolly() {
        // l(0) takes the spare l, o is elsewhere, l(2) green, l(3) finds none left
        assert_eq!(
            eval("lolly", "allot"),
            [Present, Present, Correct, Absent, Absent]
        );
    }

    #[test]
    fn duplicate_letters_green_takes_priority() {
        // SPEED vs ERASE: both E's yellow, S yellow
        assert_eq!(
            eval("speed", "erase"),
            [Present, Absent, Present, Present, Absent]
        );
    }

    #[test]
    fn duplicate_letters_green_before_yellow() {
        // ROBOT vs FLOOR: first O yellow, second O green
        assert_eq!(
            eval("robot", "floor"),
            [Present, Present, Absent, Correct, Absent]
        );
    }

    #[test]
    fn more_guess_copies_than_answer_copies() {
        // Both E's of the answer go to greens, the third guess E gets nothing
        assert_eq!(eval("geese", "crepe"), [Absent, Absent, Correct, Absent, Correct]);
    }

    #[test]
    fn hits_never_exceed_answer_count() {
        let words = ["allot", "lolly", "llama", "speed", "erase", "geese", "floor", "robot"];
        for guess in words {
            for answer in words {
                let g = Word::new(guess).unwrap();
                let a = Word::new(answer).unwrap();
                let states = evaluate(&g, &a);

                let greens = (0..5).filter(|&i| g.letter_at(i) == a.letter_at(i)).count();
                assert_eq!(states.iter().filter(|&&s| s == Correct).count(), greens);

                for letter in b'a'..=b'z' {
                    let hits = (0..5)
                        .filter(|&i| g.letter_at(i) == letter && states[i] != Absent)
                        .count();
                    let available = a.letters().iter().filter(|&&c| c == letter).count();
                    assert!(hits <= available, "{guess} vs {answer}: '{}'", letter as char);
                }
            }
        }
    }

    #[test]
    fn parse_feedback() {
        let a: RowFeedback = "GYX-_".parse().unwrap();
        let b: RowFeedback = "🟩🟨⬛⬛⬛".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_code(), "GYXXX");

        assert!("GYXX".parse::<RowFeedback>().is_err());
        assert!("GYXXQ".parse::<RowFeedback>().is_err());
    }

    #[test]
    fn counts() {
        let feedback: RowFeedback = "GGYXX".parse().unwrap();
        assert_eq!(feedback.count(Correct), 2);
        assert_eq!(feedback.count(Present), 1);
        assert_eq!(feedback.count(Absent), 2);
    }
}
