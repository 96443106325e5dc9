//! Core domain types for Wordle
//!
//! Board, evaluation, keyboard aggregation and result encoding. Everything
//! here is pure and synchronous; the game loop and the submission pipeline
//! build on top of it.

mod board;
mod codec;
mod evaluator;
mod keyboard;
mod tile;
mod word;

pub use board::{Board, MAX_ROWS, Row};
pub use codec::{DecodeError, EncodedResult, StateRow, decode, decode_strict, encode, share_grid};
pub use evaluator::{RowFeedback, evaluate};
pub use keyboard::KeyboardState;
pub use tile::{Tile, TileState};
pub use word::{WORD_LENGTH, Word, WordError};
