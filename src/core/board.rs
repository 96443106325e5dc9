//! The 6×5 game board
//!
//! Rows fill top to bottom. Only the active row may hold typed letters that
//! are not evaluated yet; rows above it are evaluated, rows below are empty.

use super::evaluator::RowFeedback;
use super::tile::{Tile, TileState};
use super::word::{WORD_LENGTH, Word};

/// Number of guesses per game
pub const MAX_ROWS: usize = 6;

/// A row of five tiles
pub type Row = [Tile; WORD_LENGTH];

/// Board state owned by one game session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    rows: [Row; MAX_ROWS],
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from evaluated rows only (used by tests and decoding)
    ///
    /// Extra rows beyond six are ignored.
    #[must_use]
    pub fn from_states(rows: &[[TileState; WORD_LENGTH]]) -> Self {
        let mut board = Self::new();
        for (dst, states) in board.rows.iter_mut().zip(rows) {
            *dst = states.map(Tile::from_state);
        }
        board
    }

    #[must_use]
    pub const fn rows(&self) -> &[Row; MAX_ROWS] {
        &self.rows
    }

    /// # Panics
    /// Panics if `index >= 6`
    #[must_use]
    pub const fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// Index of the first row whose tiles are all still `Initial`
    ///
    /// `None` when every row has been played.
    #[must_use]
    pub fn first_unplayed_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.iter().all(|t| t.state() == TileState::Initial))
    }

    /// Rows before the first unplayed one
    #[must_use]
    pub fn completed_rows(&self) -> &[Row] {
        let end = self.first_unplayed_row().unwrap_or(MAX_ROWS);
        &self.rows[..end]
    }

    /// Number of filled tiles in a row
    #[must_use]
    pub fn filled_len(&self, row: usize) -> usize {
        self.rows[row].iter().filter(|t| !t.is_empty()).count()
    }

    /// Type a letter into the next free slot of `row`
    ///
    /// Returns `false` if the row is already full.
    pub fn push_letter(&mut self, row: usize, letter: u8) -> bool {
        match self.rows[row].iter_mut().find(|t| t.is_empty()) {
            Some(slot) => {
                *slot = Tile::typed(letter);
                true
            }
            None => false,
        }
    }

    /// Remove the last typed letter of `row`
    pub fn pop_letter(&mut self, row: usize) -> Option<u8> {
        let slot = self.rows[row].iter_mut().rev().find(|t| !t.is_empty())?;
        let letter = slot.letter();
        *slot = Tile::EMPTY;
        letter
    }

    /// The row's letters as a word, if all five are filled
    #[must_use]
    pub fn row_word(&self, row: usize) -> Option<Word> {
        Word::from_slots(self.rows[row].map(Tile::letter))
    }

    /// Attach feedback to a fully typed row
    pub(crate) fn apply_feedback(&mut self, row: usize, feedback: &RowFeedback) {
        for (tile, &state) in self.rows[row].iter_mut().zip(feedback.states()) {
            if let Some(letter) = tile.letter() {
                *tile = Tile::evaluated(letter, state);
            }
        }
    }

    /// Clear every typed letter of `row` (new attempt on the same row)
    pub fn clear_row(&mut self, row: usize) {
        self.rows[row] = [Tile::EMPTY; WORD_LENGTH];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(board: &mut Board, row: usize, word: &str) {
        for b in word.bytes() {
            board.push_letter(row, b);
        }
    }

    #[test]
    fn new_board_is_unplayed() {
        let board = Board::new();
        assert_eq!(board.first_unplayed_row(), Some(0));
        assert!(board.completed_rows().is_empty());
    }

    #[test]
    fn push_and_pop_letters() {
        let mut board = Board::new();
        typed(&mut board, 0, "cra");
        assert_eq!(board.filled_len(0), 3);
        assert_eq!(board.pop_letter(0), Some(b'a'));
        assert_eq!(board.filled_len(0), 2);

        let mut empty = Board::new();
        assert_eq!(empty.pop_letter(0), None);
    }

    #[test]
    fn push_ignored_when_row_full() {
        let mut board = Board::new();
        typed(&mut board, 0, "crane");
        assert!(!board.push_letter(0, b's'));
        assert_eq!(board.row_word(0).unwrap().as_str(), "crane");
    }

    #[test]
    fn row_word_requires_full_row() {
        let mut board = Board::new();
        typed(&mut board, 0, "cran");
        assert!(board.row_word(0).is_none());
    }

    #[test]
    fn typed_letters_do_not_complete_a_row() {
        let mut board = Board::new();
        typed(&mut board, 0, "crane");
        // Still Initial: the active row is not completed
        assert_eq!(board.first_unplayed_row(), Some(0));
    }

    #[test]
    fn applied_feedback_completes_row() {
        let mut board = Board::new();
        typed(&mut board, 0, "crane");
        let answer = Word::new("slate").unwrap();
        let guess = board.row_word(0).unwrap();
        board.apply_feedback(0, &RowFeedback::evaluate(&guess, &answer));

        assert_eq!(board.first_unplayed_row(), Some(1));
        assert_eq!(board.completed_rows().len(), 1);
        assert_eq!(board.row(0)[2].state(), TileState::Correct);
        assert_eq!(board.row(0)[2].letter(), Some(b'a'));
    }

    #[test]
    fn from_states_fills_rows() {
        let board = Board::from_states(&[[TileState::Absent; 5], [TileState::Correct; 5]]);
        assert_eq!(board.completed_rows().len(), 2);
        assert!(board.row(1).iter().all(|t| t.is_empty()));
    }
}
