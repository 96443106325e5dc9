//! Game session: guess admission and the row state machine
//!
//! A session owns one board and one keyboard map. Rows move through
//! `AwaitingInput -> Evaluating -> Continuing -> AwaitingInput(next)` until a
//! win or the sixth row ends the game in `Finished`.

use crate::core::{
    Board, EncodedResult, KeyboardState, MAX_ROWS, Row, RowFeedback, Tile, Word, encode,
};
use crate::game::GameDate;
use crate::wordlists::WordSource;
use log::{debug, info};
use std::fmt;

/// Where the session is in the row state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Typing into row `n`
    AwaitingInput(usize),
    /// Row `n` was admitted and is being scored
    Evaluating(usize),
    /// Moving on to row `n`
    Continuing(usize),
    /// Input locked; `success` is true on a win
    Finished { success: bool },
}

impl Phase {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

/// Why a submitted row was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Some tiles of the row are empty
    IncompleteRow { filled: usize },
    /// The guess is neither in the dictionary nor the answer
    NotInWordList(String),
    /// The game is over
    InputLocked,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteRow { .. } => write!(f, "Not enough letters"),
            Self::NotInWordList(word) => write!(f, "{} is not in word list", word.to_uppercase()),
            Self::InputLocked => write!(f, "The game is over"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Transient message for the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// What happened to an admitted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row: usize,
    pub guess: Word,
    pub feedback: RowFeedback,
    /// Phases visited from admission to the next resting state
    pub trace: Vec<Phase>,
}

impl RowReport {
    /// The resting phase after this row
    #[must_use]
    pub fn outcome(&self) -> Option<Phase> {
        self.trace.last().copied()
    }
}

/// Check a typed row against the admission rules
///
/// A row is admissible when all five tiles hold a letter and the word is in
/// the dictionary or equals the answer. The answer is always accepted so
/// every puzzle stays solvable with a trimmed dictionary.
///
/// # Errors
/// Returns the `Rejection` that applies; nothing is mutated.
pub fn admit<S: WordSource + ?Sized>(row: &Row, answer: &Word, source: &S) -> Result<Word, Rejection> {
    let Some(guess) = Word::from_slots(row.map(Tile::letter)) else {
        let filled = row.iter().filter(|t| !t.is_empty()).count();
        return Err(Rejection::IncompleteRow { filled });
    };

    if guess != *answer && !source.is_valid_guess(guess.as_str()) {
        return Err(Rejection::NotInWordList(guess.to_string()));
    }

    Ok(guess)
}

/// One player's attempt at one puzzle
pub struct GameSession<'a, S: WordSource + ?Sized> {
    source: &'a S,
    date: GameDate,
    answer: Word,
    board: Board,
    keyboard: KeyboardState,
    phase: Phase,
    notice: Option<Notice>,
    shake: bool,
    signature_prompt_open: bool,
    result: Option<EncodedResult>,
}

impl<'a, S: WordSource + ?Sized> GameSession<'a, S> {
    /// Start the daily puzzle for `date`
    pub fn new(source: &'a S, date: GameDate) -> Self {
        let answer = source.answer_for(date);
        Self::with_answer(source, date, answer)
    }

    /// Start a session with a fixed answer (practice games, tests)
    pub fn with_answer(source: &'a S, date: GameDate, answer: Word) -> Self {
        debug!("new session for {date}");
        Self {
            source,
            date,
            answer,
            board: Board::new(),
            keyboard: KeyboardState::new(),
            phase: Phase::AwaitingInput(0),
            notice: None,
            shake: false,
            signature_prompt_open: false,
            result: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn date(&self) -> GameDate {
        self.date
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// The answer, once the game is over
    #[must_use]
    pub fn revealed_answer(&self) -> Option<&Word> {
        self.phase.is_finished().then_some(&self.answer)
    }

    /// Row currently accepting letters
    #[must_use]
    pub const fn active_row(&self) -> Option<usize> {
        match self.phase {
            Phase::AwaitingInput(row) => Some(row),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.phase.is_finished()
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the last submission was rejected and the row should shake
    #[must_use]
    pub const fn is_shaking(&self) -> bool {
        self.shake
    }

    /// Clear the transient message and the shake flag
    pub fn acknowledge(&mut self) {
        self.notice = None;
        self.shake = false;
    }

    #[must_use]
    pub const fn signature_prompt_open(&self) -> bool {
        self.signature_prompt_open
    }

    /// Mark a pending signature request (the submit flow sets and clears it)
    pub fn set_signature_prompt(&mut self, open: bool) {
        self.signature_prompt_open = open;
    }

    /// Encoded board, available once the game is finished
    #[must_use]
    pub const fn result(&self) -> Option<&EncodedResult> {
        self.result.as_ref()
    }

    /// Type a letter; ignored when locked, the row is full or `ch` is not a letter
    pub fn push_letter(&mut self, ch: char) -> bool {
        let Some(row) = self.active_row() else {
            return false;
        };
        if !ch.is_ascii_alphabetic() {
            return false;
        }
        self.shake = false;
        self.board.push_letter(row, ch.to_ascii_lowercase() as u8)
    }

    /// Delete the last typed letter of the active row
    pub fn pop_letter(&mut self) -> Option<char> {
        let row = self.active_row()?;
        self.shake = false;
        self.board.pop_letter(row).map(char::from)
    }

    /// Submit the active row
    ///
    /// # Errors
    /// Returns a `Rejection` (and sets the notice and shake flag) when the row
    /// is not admissible; the board and row pointer are unchanged.
    pub fn submit_row(&mut self) -> Result<RowReport, Rejection> {
        let Some(row) = self.active_row() else {
            return Err(Rejection::InputLocked);
        };

        let guess = match admit(self.board.row(row), &self.answer, self.source) {
            Ok(guess) => guess,
            Err(rejection) => {
                debug!("row {row} rejected: {rejection}");
                self.notice = Some(Notice {
                    text: rejection.to_string(),
                    kind: NoticeKind::Error,
                });
                self.shake = true;
                return Err(rejection);
            }
        };

        let mut trace = Vec::with_capacity(3);
        self.transition(Phase::Evaluating(row), &mut trace);

        let feedback = RowFeedback::evaluate(&guess, &self.answer);
        self.board.apply_feedback(row, &feedback);
        self.keyboard = self.keyboard.update(self.board.row(row));

        if feedback.is_win() {
            self.transition(Phase::Finished { success: true }, &mut trace);
            self.finish(celebration(row + 1), NoticeKind::Success);
        } else if row + 1 == MAX_ROWS {
            self.transition(Phase::Finished { success: false }, &mut trace);
            let text = self.answer.as_str().to_uppercase();
            self.finish(text, NoticeKind::Info);
        } else {
            self.transition(Phase::Continuing(row + 1), &mut trace);
            self.transition(Phase::AwaitingInput(row + 1), &mut trace);
            self.notice = None;
        }

        self.shake = false;
        Ok(RowReport {
            row,
            guess,
            feedback,
            trace,
        })
    }

    fn transition(&mut self, next: Phase, trace: &mut Vec<Phase>) {
        debug!("{:?} -> {next:?}", self.phase);
        self.phase = next;
        trace.push(next);
    }

    fn finish(&mut self, text: String, kind: NoticeKind) {
        let result = encode(&self.board);
        info!(
            "game {} finished in {} rows: {result}",
            self.date,
            result.row_count()
        );
        self.result = Some(result);
        self.notice = Some(Notice { text, kind });
    }
}

fn celebration(rows: usize) -> String {
    match rows {
        1 => "Genius",
        2 => "Magnificent",
        3 => "Impressive",
        4 => "Splendid",
        5 => "Great",
        _ => "Phew",
    }
    .to_string()
}

/// Letters typed so far in a row, uppercase, for display
#[must_use]
pub fn row_text(row: &Row) -> String {
    row.iter()
        .map(|t| t.letter().map_or(' ', |l| char::from(l.to_ascii_uppercase())))
        .collect()
}
