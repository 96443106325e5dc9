//! Formatting utilities for terminal output

use crate::core::{EncodedResult, MAX_ROWS, Row, TileState, share_grid};
use colored::{ColoredString, Colorize};

/// One tile as a colored, padded letter cell
#[must_use]
pub fn colored_tile(letter: Option<u8>, state: TileState) -> ColoredString {
    let ch = letter.map_or(' ', |l| char::from(l.to_ascii_uppercase()));
    let cell = format!(" {ch} ");
    match state {
        TileState::Correct => cell.black().on_green().bold(),
        TileState::Present => cell.black().on_yellow().bold(),
        TileState::Absent => cell.white().on_bright_black(),
        TileState::Initial => cell.normal(),
    }
}

/// A board row as colored cells
#[must_use]
pub fn format_row(row: &Row) -> String {
    row.iter()
        .map(|t| colored_tile(t.letter(), t.state()).to_string())
        .collect()
}

/// `Wordle <n> <rows>/6` share header, `X/6` for a loss
#[must_use]
pub fn share_header(puzzle: i64, result: &EncodedResult) -> String {
    let score = if result.is_win() {
        result.row_count().to_string()
    } else {
        "X".to_string()
    };
    format!("Wordle {puzzle} {score}/{MAX_ROWS}")
}

/// Header plus emoji grid, ready to paste
#[must_use]
pub fn share_text(puzzle: i64, result: &EncodedResult) -> String {
    format!("{}\n\n{}", share_header(puzzle, result), share_grid(&result.decode()))
}

/// `0x1234…cdef` form of a wallet address
#[must_use]
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64).max(0.0) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
