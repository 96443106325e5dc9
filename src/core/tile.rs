//! Tiles and per-letter match states
//!
//! A tile is one cell of the board: an optional letter plus the feedback it
//! received. Unguessed tiles carry [`TileState::Initial`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feedback attached to a single tile
///
/// Variants are ordered by how much they reveal, so `Ord` doubles as the
/// keyboard precedence rule: `Correct > Present > Absent > Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    /// Not evaluated yet
    #[default]
    Initial,
    /// Letter is not in the answer (or all its instances are used up)
    Absent,
    /// Letter is in the answer at another position
    Present,
    /// Letter is at the right position
    Correct,
}

impl TileState {
    /// Code character used by the board encoding
    ///
    /// `Initial` maps to `'X'` so the mapping is total.
    #[inline]
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent | Self::Initial => 'X',
        }
    }

    /// Inverse of [`TileState::code`]; unknown characters yield `None`
    #[inline]
    #[must_use]
    pub const fn from_code(ch: char) -> Option<Self> {
        match ch {
            'G' => Some(Self::Correct),
            'Y' => Some(Self::Present),
            'X' => Some(Self::Absent),
            _ => None,
        }
    }

    /// Emoji square for share strings
    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬛',
            Self::Initial => '⬜',
        }
    }

    /// Whether the tile has been evaluated
    #[inline]
    #[must_use]
    pub const fn is_evaluated(self) -> bool {
        !matches!(self, Self::Initial)
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Absent => "absent",
            Self::Present => "present",
            Self::Correct => "correct",
        };
        f.write_str(name)
    }
}

/// One cell of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    letter: Option<u8>,
    state: TileState,
}

impl Tile {
    /// An empty, unguessed tile
    pub const EMPTY: Self = Self {
        letter: None,
        state: TileState::Initial,
    };

    /// A typed but not yet evaluated letter
    #[must_use]
    pub const fn typed(letter: u8) -> Self {
        Self {
            letter: Some(letter),
            state: TileState::Initial,
        }
    }

    /// A letter with its feedback
    #[must_use]
    pub const fn evaluated(letter: u8, state: TileState) -> Self {
        Self {
            letter: Some(letter),
            state,
        }
    }

    /// A decoded tile: feedback only, the letter is not recoverable
    #[must_use]
    pub const fn from_state(state: TileState) -> Self {
        Self {
            letter: None,
            state,
        }
    }

    #[inline]
    #[must_use]
    pub const fn letter(self) -> Option<u8> {
        self.letter
    }

    #[inline]
    #[must_use]
    pub const fn state(self) -> TileState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.letter.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(TileState::Correct > TileState::Present);
        assert!(TileState::Present > TileState::Absent);
        assert!(TileState::Absent > TileState::Initial);
    }

    #[test]
    fn code_mapping_is_total() {
        assert_eq!(TileState::Correct.code(), 'G');
        assert_eq!(TileState::Present.code(), 'Y');
        assert_eq!(TileState::Absent.code(), 'X');
        assert_eq!(TileState::Initial.code(), 'X');
    }

    #[test]
    fn from_code_rejects_unknown() {
        assert_eq!(TileState::from_code('G'), Some(TileState::Correct));
        assert_eq!(TileState::from_code('g'), None);
        assert_eq!(TileState::from_code('?'), None);
    }

    #[test]
    fn empty_tile_is_initial() {
        assert!(Tile::EMPTY.is_empty());
        assert_eq!(Tile::EMPTY.state(), TileState::Initial);
        assert_eq!(Tile::default(), Tile::EMPTY);
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&TileState::Present).unwrap();
        assert_eq!(json, "\"present\"");
    }
}
