//! Board result encoding
//!
//! A finished board is reduced to one character per tile of every completed
//! row: `G` (correct), `Y` (present), `X` (absent). Letters are dropped, so
//! the code reveals how a player did without revealing the answer.

use super::board::Board;
use super::tile::TileState;
use super::word::WORD_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decoded row: match states only
pub type StateRow = [TileState; WORD_LENGTH];

/// Match-state code of a finished board
///
/// Length is always a multiple of five. Built once by [`encode`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedResult(String);

impl EncodedResult {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of rows the code describes
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.0.len() / WORD_LENGTH
    }

    /// Whether the last encoded row is all green
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.0.len() >= WORD_LENGTH && self.0.ends_with("GGGGG")
    }

    /// Decode back into state rows
    #[must_use]
    pub fn decode(&self) -> Vec<StateRow> {
        decode(&self.0)
    }
}

impl fmt::Display for EncodedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated parse: rejects partial rows and unknown characters
impl FromStr for EncodedResult {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_strict(s)?;
        Ok(Self(s.to_string()))
    }
}

/// Error from [`decode_strict`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Code length is not a multiple of five
    TrailingChunk { length: usize },
    /// Character outside `G`/`Y`/`X`
    InvalidCharacter { position: usize, found: char },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrailingChunk { length } => {
                write!(f, "Code length {length} is not a multiple of {WORD_LENGTH}")
            }
            Self::InvalidCharacter { position, found } => {
                write!(f, "Invalid character '{found}' at position {position}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode the completed rows of a board
///
/// Rows up to (not including) the first all-`Initial` row are encoded; a
/// fully played board encodes all six. `Initial` tiles inside those rows
/// fall back to `X`.
///
/// # Examples
/// ```
/// use wordle_chain::core::{Board, TileState, encode};
///
/// let board = Board::from_states(&[
///     [TileState::Absent, TileState::Present, TileState::Absent, TileState::Absent, TileState::Correct],
///     [TileState::Correct; 5],
/// ]);
/// assert_eq!(encode(&board).as_str(), "XYXXGGGGGG");
/// ```
#[must_use]
pub fn encode(board: &Board) -> EncodedResult {
    let code = board
        .completed_rows()
        .iter()
        .flatten()
        .map(|tile| tile.state().code())
        .collect();
    EncodedResult(code)
}

/// Decode a code into state rows
///
/// Never fails: a trailing partial chunk is dropped and unknown characters
/// become `Initial`.
#[must_use]
pub fn decode(code: &str) -> Vec<StateRow> {
    let chars: Vec<char> = code.chars().collect();
    chars
        .chunks_exact(WORD_LENGTH)
        .map(|chunk| {
            let mut row = [TileState::Initial; WORD_LENGTH];
            for (state, &ch) in row.iter_mut().zip(chunk) {
                *state = TileState::from_code(ch).unwrap_or(TileState::Initial);
            }
            row
        })
        .collect()
}

/// Decode a code, rejecting anything [`decode`] would silently repair
///
/// # Errors
/// Returns `DecodeError` on a partial trailing row or a character outside
/// `G`/`Y`/`X`.
pub fn decode_strict(code: &str) -> Result<Vec<StateRow>, DecodeError> {
    if let Some((position, found)) = code
        .chars()
        .enumerate()
        .find(|&(_, ch)| TileState::from_code(ch).is_none())
    {
        return Err(DecodeError::InvalidCharacter { position, found });
    }

    let length = code.chars().count();
    if length % WORD_LENGTH != 0 {
        return Err(DecodeError::TrailingChunk { length });
    }

    Ok(decode(code))
}

/// Emoji grid, one line per row
#[must_use]
pub fn share_grid(rows: &[StateRow]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|s| s.emoji()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
