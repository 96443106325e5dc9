//! Keyboard highlighting
//!
//! Tracks the best state seen for each letter across evaluated rows.

use super::board::Row;
use super::tile::TileState;
use rustc_hash::FxHashMap;

/// Best-known state per letter
///
/// A recorded state only ever moves up the precedence order
/// (`Correct > Present > Absent`), so a letter shown green stays green.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    letters: FxHashMap<u8, TileState>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State recorded for `letter`, `Initial` if never seen
    #[must_use]
    pub fn get(&self, letter: u8) -> TileState {
        self.letters
            .get(&letter.to_ascii_lowercase())
            .copied()
            .unwrap_or_default()
    }

    /// Fold an evaluated row into a new map, leaving `self` untouched
    ///
    /// # Examples
    /// ```
    /// use wordle_chain::core::{KeyboardState, Tile, TileState};
    ///
    /// let row = [
    ///     Tile::evaluated(b'c', TileState::Correct),
    ///     Tile::evaluated(b'r', TileState::Absent),
    ///     Tile::evaluated(b'a', TileState::Present),
    ///     Tile::evaluated(b'n', TileState::Absent),
    ///     Tile::evaluated(b'e', TileState::Absent),
    /// ];
    /// let keys = KeyboardState::new().update(&row);
    /// assert_eq!(keys.get(b'c'), TileState::Correct);
    /// assert_eq!(keys.get(b'z'), TileState::Initial);
    /// ```
    #[must_use]
    pub fn update(&self, row: &Row) -> Self {
        let mut next = self.clone();
        for tile in row {
            let (Some(letter), state) = (tile.letter(), tile.state()) else {
                continue;
            };
            if !state.is_evaluated() {
                continue;
            }
            let entry = next.letters.entry(letter).or_default();
            if state > *entry {
                *entry = state;
            }
        }
        next
    }

    /// Letters with a recorded state, alphabetically
    #[must_use]
    pub fn entries(&self) -> Vec<(u8, TileState)> {
        let mut entries: Vec<_> = self.letters.iter().map(|(&l, &s)| (l, s)).collect();
        entries.sort_unstable_by_key(|&(l, _)| l);
        entries
    }
}
