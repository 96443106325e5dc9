//! Simple interactive CLI mode
//!
//! Line-based game without the TUI: one guess per line.

use super::LocalSubmitter;
use crate::core::WORD_LENGTH;
use crate::game::{GameDate, GameSession, NoticeKind, puzzle_number};
use crate::output::{print_board, print_keyboard, print_share};
use crate::wordlists::Dictionary;
use colored::Colorize;
use std::io::{self, Write};

/// Run the simple interactive CLI mode
///
/// A finished daily game goes to `submitter` when one is given.
///
/// # Errors
///
/// Returns an error if there's an I/O error reading user input.
pub fn run_simple(
    dictionary: &Dictionary,
    date: GameDate,
    submitter: Option<&LocalSubmitter>,
) -> Result<(), String> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Wordle - Simple Mode                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Guess the five-letter word in six tries.");
    println!("Commands: 'quit' to exit, 'new' for a practice game\n");

    let mut session = GameSession::new(dictionary, date);
    let mut practice = false;
    println!("Puzzle #{} ({date})\n", puzzle_number(date));

    loop {
        if session.is_locked() {
            if let Some(result) = session.result() {
                print_share(session.date(), result);
            }
            if let (Some(submitter), false) = (submitter, practice) {
                match submitter.submit(&mut session) {
                    Ok(receipt) => println!("\n📨 {}\n", receipt.to_string().bright_green()),
                    Err(e) => println!("\n{}\n", format!("❌ Submission failed: {e:#}").red()),
                }
            }
            match get_user_input("Play a practice game? (yes/no)")?
                .to_lowercase()
                .as_str()
            {
                "yes" | "y" => {
                    session = GameSession::with_answer(dictionary, date, dictionary.random_answer());
                    practice = true;
                    println!("\n🔄 Practice game started!\n");
                    continue;
                }
                _ => {
                    println!("\n👋 Thanks for playing!\n");
                    return Ok(());
                }
            }
        }

        let row = session.active_row().unwrap_or_default();
        let input = get_user_input(&format!("Guess {}/6", row + 1))?.to_lowercase();

        match input.as_str() {
            "quit" | "q" | "exit" => {
                println!("\n👋 Thanks for playing!\n");
                return Ok(());
            }
            "new" | "n" => {
                session = GameSession::with_answer(dictionary, date, dictionary.random_answer());
                practice = true;
                println!("\n🔄 Practice game started!\n");
                continue;
            }
            _ => {}
        }

        if input.chars().count() > WORD_LENGTH {
            println!("{}\n", "❌ Too many letters".red());
            continue;
        }
        for ch in input.chars() {
            session.push_letter(ch);
        }

        match session.submit_row() {
            Ok(report) => {
                println!();
                print_board(session.board());
                println!();
                print_keyboard(session.keyboard());
                println!();
                if report.feedback.is_win() {
                    println!("\n{}", "═".repeat(70).bright_cyan());
                    println!(
                        "{}",
                        "    🎉 🎊 ✨  W O R D L E   S O L V E D !  ✨ 🎊 🎉    "
                            .bright_green()
                            .bold()
                    );
                    println!("{}", "═".repeat(70).bright_cyan());
                }
            }
            Err(rejection) => {
                println!("{}\n", format!("❌ {rejection}").red());
                while session.pop_letter().is_some() {}
            }
        }

        if let Some(notice) = session.notice() {
            match notice.kind {
                NoticeKind::Success => println!("  {}\n", notice.text.bright_yellow().bold()),
                NoticeKind::Info => println!("  The word was {}\n", notice.text.bright_yellow().bold()),
                NoticeKind::Error => {}
            }
        }
        session.acknowledge();
    }
}

/// Get user input with a prompt
fn get_user_input(prompt: &str) -> Result<String, String> {
    print!("{prompt}: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok("quit".to_string());
    }

    Ok(input.trim().to_string())
}
