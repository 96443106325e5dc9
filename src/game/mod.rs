//! Game loop
//!
//! Daily answer selection and the per-session row state machine.

mod daily;
mod session;

pub use daily::{DateError, EPOCH, GameDate, answer_for_date, puzzle_number};
pub use session::{GameSession, Notice, NoticeKind, Phase, Rejection, RowReport, admit, row_text};
