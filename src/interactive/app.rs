//! TUI application state and logic

use crate::commands::LocalSubmitter;
use crate::core::MAX_ROWS;
use crate::game::{GameDate, GameSession, Notice, NoticeKind, Phase, puzzle_number};
use crate::output::formatters::share_text;
use crate::wordlists::Dictionary;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

const MAX_MESSAGES: usize = 5;

/// Application state
pub struct App<'a> {
    pub dictionary: &'a Dictionary,
    pub date: GameDate,
    pub session: GameSession<'a, Dictionary>,
    pub practice: bool,
    pub messages: Vec<Notice>,
    pub stats: Statistics,
    pub should_quit: bool,
    pub input_mode: InputMode,
    /// Receives the daily game once it ends
    pub submitter: Option<&'a LocalSubmitter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Playing,
    GameOver,
}

#[derive(Debug, Default, Clone)]
pub struct Statistics {
    pub total_games: usize,
    pub games_won: usize,
    /// Index `n` counts wins in `n` rows
    pub guess_distribution: [usize; MAX_ROWS + 1],
}

impl Statistics {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.games_won as f64 / self.total_games as f64 * 100.0
        }
    }
}

impl<'a> App<'a> {
    /// Start on the daily puzzle for `date`
    #[must_use]
    pub fn new(dictionary: &'a Dictionary, date: GameDate) -> Self {
        let mut app = Self {
            dictionary,
            date,
            session: GameSession::new(dictionary, date),
            practice: false,
            messages: Vec::new(),
            stats: Statistics::default(),
            should_quit: false,
            input_mode: InputMode::Playing,
            submitter: None,
        };
        app.add_message(
            &format!("Puzzle #{} - guess the word in six tries", puzzle_number(date)),
            NoticeKind::Info,
        );
        app
    }

    /// Hand finished daily games to `submitter`
    #[must_use]
    pub fn with_submitter(mut self, submitter: &'a LocalSubmitter) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Switch to a practice game with a random answer
    pub fn new_game(&mut self) {
        self.session =
            GameSession::with_answer(self.dictionary, self.date, self.dictionary.random_answer());
        self.practice = true;
        self.input_mode = InputMode::Playing;
        self.messages.clear();
        self.add_message("Practice game started!", NoticeKind::Info);
    }

    pub fn submit(&mut self) {
        match self.session.submit_row() {
            Ok(report) => {
                if let Some(Phase::Finished { success }) = report.outcome() {
                    self.record_game(success, report.row + 1);
                }
            }
            Err(rejection) => self.add_message(&rejection.to_string(), NoticeKind::Error),
        }
    }

    fn record_game(&mut self, success: bool, rows: usize) {
        self.stats.total_games += 1;
        if success {
            self.stats.games_won += 1;
            if rows <= MAX_ROWS {
                self.stats.guess_distribution[rows] += 1;
            }
        }

        if let Some(notice) = self.session.notice().cloned() {
            let text = if success {
                notice.text
            } else {
                format!("The word was {}", notice.text)
            };
            self.add_message(&text, notice.kind);
        }
        if !self.practice {
            self.hand_off();
        }
        self.add_message("Press 'n' for a practice game or 'q' to quit.", NoticeKind::Info);
        self.input_mode = InputMode::GameOver;
    }

    fn hand_off(&mut self) {
        let Some(submitter) = self.submitter else {
            return;
        };
        match submitter.submit(&mut self.session) {
            Ok(receipt) => self.add_message(&receipt.to_string(), NoticeKind::Success),
            Err(e) => self.add_message(&format!("Submission failed: {e:#}"), NoticeKind::Error),
        }
    }

    /// Share text for the finished game
    #[must_use]
    pub fn share(&self) -> Option<String> {
        let result = self.session.result()?;
        let text = share_text(puzzle_number(self.date), result);
        Some(if self.practice {
            text.replacen("Wordle", "Practice", 1)
        } else {
            text
        })
    }

    pub fn add_message(&mut self, text: &str, kind: NoticeKind) {
        self.messages.push(Notice {
            text: text.to_string(),
            kind,
        });

        // Keep only the latest messages
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    /// Apply one key press
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::GameOver => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('n') => self.new_game(),
                _ => {}
            },
            InputMode::Playing => {
                // Any key clears the shake from a rejected row
                if self.session.is_shaking() {
                    self.session.acknowledge();
                }
                match key.code {
                    KeyCode::Esc => self.should_quit = true,
                    KeyCode::Char(c) => {
                        self.session.push_letter(c);
                    }
                    KeyCode::Backspace => {
                        self.session.pop_letter();
                    }
                    KeyCode::Enter => self.submit(),
                    _ => {}
                }
            }
        }
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (fixes Windows double-input bug)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.on_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EPOCH;
    use crate::wordlists::WordSource;

    fn press(app: &mut App<'_>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_word(app: &mut App<'_>, word: &str) {
        for ch in word.chars() {
            press(app, KeyCode::Char(ch));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn winning_records_stats() {
        let dict = Dictionary::embedded();
        let mut app = App::new(&dict, EPOCH);
        let answer = dict.answer_for(EPOCH);

        type_word(&mut app, answer.as_str());
        assert_eq!(app.input_mode, InputMode::GameOver);
        assert_eq!(app.stats.total_games, 1);
        assert_eq!(app.stats.games_won, 1);
        assert_eq!(app.stats.guess_distribution[1], 1);
        assert!(app.share().unwrap().starts_with("Wordle 0 1/6"));
    }

    #[test]
    fn rejected_row_shakes_then_clears() {
        let dict = Dictionary::embedded();
        let mut app = App::new(&dict, EPOCH);

        type_word(&mut app, "zzzzz");
        assert!(app.session.is_shaking());
        assert_eq!(app.messages.last().unwrap().kind, NoticeKind::Error);

        press(&mut app, KeyCode::Backspace);
        assert!(!app.session.is_shaking());
        assert_eq!(app.session.board().filled_len(0), 4);
    }

    #[test]
    fn game_over_keys() {
        let dict = Dictionary::embedded();
        let mut app = App::new(&dict, EPOCH);
        type_word(&mut app, dict.answer_for(EPOCH).as_str());

        // Letters do nothing once the game is over
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::GameOver);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Playing);
        assert!(app.practice);
        assert_eq!(app.session.phase(), Phase::AwaitingInput(0));

        app.input_mode = InputMode::GameOver;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn finished_daily_game_is_submitted() {
        let dict = Dictionary::embedded();
        let submitter = LocalSubmitter::new(
            crate::submission::RelayConfig::default(),
            None,
            None,
            1,
            None,
        )
        .unwrap();
        let mut app = App::new(&dict, EPOCH).with_submitter(&submitter);
        type_word(&mut app, dict.answer_for(EPOCH).as_str());

        let records = submitter.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].game_id, 0);
        assert_eq!(records[0].user, submitter.wallet_address());
        assert!(
            app.messages
                .iter()
                .any(|m| m.kind == NoticeKind::Success && m.text.contains("submitted with token 1"))
        );

        // Practice games stay local
        press(&mut app, KeyCode::Char('n'));
        assert!(app.practice);
        app.session = GameSession::with_answer(&dict, EPOCH, crate::core::Word::new("cigar").unwrap());
        type_word(&mut app, "cigar");
        assert_eq!(app.input_mode, InputMode::GameOver);
        assert_eq!(submitter.records().unwrap().len(), 1);
    }

    #[test]
    fn messages_are_capped() {
        let dict = Dictionary::embedded();
        let mut app = App::new(&dict, EPOCH);
        for i in 0..10 {
            app.add_message(&i.to_string(), NoticeKind::Info);
        }
        assert_eq!(app.messages.len(), MAX_MESSAGES);
        assert_eq!(app.messages.last().unwrap().text, "9");
    }
}
