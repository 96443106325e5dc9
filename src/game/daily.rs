//! Daily puzzle selection
//!
//! The answer is a pure function of the calendar date: the number of days
//! since the first puzzle, wrapped around the answer list. Callers pass the
//! date explicitly; nothing is cached.

use crate::core::Word;
use chrono::format::ParseErrorKind;
use chrono::{Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date of puzzle #0
pub const EPOCH: GameDate = match NaiveDate::from_ymd_opt(2021, 6, 19) {
    Some(date) => GameDate(date),
    None => panic!("invalid puzzle epoch"),
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date (proleptic Gregorian, UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameDate(NaiveDate);

/// Error type for invalid dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    Format(String),
    NoSuchDate(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(s) => write!(f, "Expected a date as YYYY-MM-DD, got '{s}'"),
            Self::NoSuchDate(s) => write!(f, "No such date: {s}"),
        }
    }
}

impl std::error::Error for DateError {}

impl GameDate {
    /// # Errors
    /// Returns `DateError::NoSuchDate` if the month or day does not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError::NoSuchDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Today's date in UTC
    #[must_use]
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// The date `days` later (earlier when negative)
    #[must_use]
    pub fn offset(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(TimeDelta::try_days(days)?).map(Self)
    }
}

impl From<NaiveDate> for GameDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for GameDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|e| match e.kind() {
                ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
                    DateError::NoSuchDate(s.to_string())
                }
                _ => DateError::Format(s.to_string()),
            })
    }
}

/// Puzzle number for a date (negative before the first puzzle)
#[must_use]
pub fn puzzle_number(date: GameDate) -> i64 {
    date.0.signed_duration_since(EPOCH.0).num_days()
}

/// The answer for `date`
///
/// Returns `None` only when `answers` is empty.
///
/// # Examples
/// ```
/// use wordle_chain::core::Word;
/// use wordle_chain::game::{EPOCH, answer_for_date};
///
/// let answers = [Word::new("cigar").unwrap(), Word::new("rebut").unwrap()];
/// assert_eq!(answer_for_date(EPOCH, &answers).unwrap().as_str(), "cigar");
/// ```
#[must_use]
pub fn answer_for_date(date: GameDate, answers: &[Word]) -> Option<&Word> {
    let len = i64::try_from(answers.len()).ok().filter(|&n| n > 0)?;
    let index = usize::try_from(puzzle_number(date).rem_euclid(len)).ok()?;
    answers.get(index)
}
