//! Display functions for command results

use super::formatters::{colored_tile, create_progress_bar, format_row, share_text, short_address};
use crate::core::{Board, EncodedResult, KeyboardState, StateRow, TileState};
use crate::game::{GameDate, puzzle_number};
use crate::results::{Distribution, FetchReport, ResultEntry};
use colored::Colorize;
use std::collections::BTreeMap;

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Print the played rows of a board
pub fn print_board(board: &Board) {
    for row in board.rows() {
        if row.iter().all(|t| t.is_empty()) {
            continue;
        }
        println!("   {}", format_row(row));
    }
}

/// Print a QWERTY keyboard colored by the best state per letter
pub fn print_keyboard(keyboard: &KeyboardState) {
    for (indent, keys) in KEYBOARD_ROWS.iter().enumerate() {
        let line: String = keys
            .bytes()
            .map(|k| colored_tile(Some(k), keyboard.get(k)).to_string())
            .collect();
        println!("   {}{line}", " ".repeat(indent * 2));
    }
}

/// Print the share block for a finished game
pub fn print_share(date: GameDate, result: &EncodedResult) {
    println!("\n{}", share_text(puzzle_number(date), result));
    println!("\n{} {}", "Code:".bright_cyan(), result.as_str().bright_yellow());
}

/// Print decoded rows as state-only tiles
pub fn print_decoded(code: &str, rows: &[StateRow]) {
    println!("\n{}", "─".repeat(40).cyan());
    println!("Code: {}", code.bright_yellow().bold());
    println!("{}", "─".repeat(40).cyan());
    if rows.is_empty() {
        println!("   (no complete rows)");
    }
    for row in rows {
        let line: String = row
            .iter()
            .map(|&s| colored_tile(None, s).to_string())
            .collect();
        println!("   {line}");
    }
    let solved = rows
        .last()
        .is_some_and(|r| r.iter().all(|&s| s == TileState::Correct));
    println!();
    if solved {
        println!("{}", format!("✅ Solved in {} rows", rows.len()).green().bold());
    } else {
        println!("{}", format!("❌ Not solved after {} rows", rows.len()).red().bold());
    }
}

/// Print the puzzle for a date
pub fn print_today(date: GameDate, answer: Option<&str>) {
    println!("\n{}", "═".repeat(40).cyan());
    println!(
        " {} #{} ({date})",
        "WORDLE".bright_cyan().bold(),
        puzzle_number(date)
    );
    println!("{}", "═".repeat(40).cyan());
    if let Some(answer) = answer {
        println!("   Answer: {}", answer.to_uppercase().bright_yellow().bold());
    }
}

/// Print fetched results grouped per player, then the distribution
pub fn print_results(game_id: i64, report: &FetchReport, groups: &BTreeMap<String, Vec<ResultEntry>>) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} #{game_id} ", "RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    for (user, entries) in groups {
        println!("\n👤 {}", short_address(user).bright_cyan().bold());
        for entry in entries {
            let score = entry
                .solved_in()
                .map_or_else(|| "X".to_string(), |n| n.to_string());
            println!("   token {:>4}  {score}/6", entry.token_id);
            for row in &entry.rows {
                let line: String = row
                    .iter()
                    .map(|&s| colored_tile(None, s).to_string())
                    .collect();
                println!("      {line}");
            }
        }
    }

    if report.failed > 0 {
        println!(
            "\n{}",
            format!("⚠ {} record(s) could not be decrypted", report.failed).yellow()
        );
    }

    print_distribution(&Distribution::from_entries(&report.entries));
}

/// Print a win distribution as bars
pub fn print_distribution(dist: &Distribution) {
    let total = dist.total();
    println!("\n📈 {}", "Distribution:".bright_cyan().bold());
    if total == 0 {
        println!("   No results");
        return;
    }
    let rows = dist
        .solved
        .iter()
        .enumerate()
        .map(|(i, &count)| ((i + 1).to_string(), count))
        .chain(std::iter::once(("X".to_string(), dist.unsolved)));
    for (label, count) in rows {
        let pct = count as f64 / total as f64 * 100.0;
        let bar = create_progress_bar(count as f64, total as f64, 30);
        println!("   {label}: {} {count:4} ({pct:5.1}%)", bar.green());
    }
}
