//! Daily puzzle lookup

use crate::game::{GameDate, puzzle_number};
use crate::wordlists::{Dictionary, WordSource};

/// The puzzle for one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPuzzle {
    pub date: GameDate,
    pub number: i64,
    pub answer: String,
}

#[must_use]
pub fn daily_puzzle(dictionary: &Dictionary, date: GameDate) -> DailyPuzzle {
    DailyPuzzle {
        date,
        number: puzzle_number(date),
        answer: dictionary.answer_for(date).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EPOCH;
    use crate::wordlists::ANSWERS;

    #[test]
    fn epoch_is_puzzle_zero() {
        let puzzle = daily_puzzle(&Dictionary::embedded(), EPOCH);
        assert_eq!(puzzle.number, 0);
        assert_eq!(puzzle.answer, ANSWERS[0]);
    }

    #[test]
    fn next_day_is_next_answer() {
        let next = EPOCH.offset(1).unwrap();
        let puzzle = daily_puzzle(&Dictionary::embedded(), next);
        assert_eq!(puzzle.number, 1);
        assert_eq!(puzzle.answer, ANSWERS[1 % ANSWERS.len()]);
    }
}
