//! Resolved runtime settings
//!
//! The CLI parses flags and environment variables; this module turns them
//! into a dictionary, a game date and the relay settings.

use crate::core::Word;
use crate::game::GameDate;
use crate::submission::RelayConfig;
use crate::wordlists::loader::{load_from_file, words_from_slice};
use crate::wordlists::{ANSWERS, Dictionary};
use anyhow::{Context, Result};
use log::debug;

/// Everything a command needs to run
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dictionary: Dictionary,
    pub date: GameDate,
    pub relay: RelayConfig,
    /// Hex vault secret; commands that decrypt require it
    pub vault_secret: Option<String>,
}

impl AppConfig {
    /// # Errors
    /// Fails if the word list cannot be loaded or the date does not parse.
    pub fn resolve(
        wordlist: &str,
        date: Option<&str>,
        relay: RelayConfig,
        vault_secret: Option<String>,
    ) -> Result<Self> {
        let dictionary = load_dictionary(wordlist)?;
        let date = match date {
            Some(text) => text
                .parse::<GameDate>()
                .with_context(|| format!("invalid --date '{text}'"))?,
            None => GameDate::today(),
        };
        debug!(
            "config: {} answers, {} allowed, date {date}",
            dictionary.answers().len(),
            dictionary.allowed_len()
        );
        Ok(Self {
            dictionary,
            date,
            relay,
            vault_secret,
        })
    }
}

/// Build the dictionary for a `--wordlist` value
///
/// - `all`: embedded answers, embedded accepted guesses
/// - `answers`: embedded answers for both
/// - anything else: accepted guesses read from that file, embedded answers
///
/// # Errors
/// Fails if the file cannot be read.
pub fn load_dictionary(mode: &str) -> Result<Dictionary> {
    let answers = words_from_slice(ANSWERS);
    match mode {
        "all" => Ok(Dictionary::embedded()),
        "answers" => Ok(Dictionary::new(answers.clone(), answers)?),
        path => {
            let allowed: Vec<Word> =
                load_from_file(path).with_context(|| format!("reading word list {path}"))?;
            Ok(Dictionary::new(answers, allowed)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlists::{ALLOWED_COUNT, ANSWERS_COUNT, WordSource};
    use std::io::Write;

    #[test]
    fn all_mode_uses_embedded_lists() {
        let dict = load_dictionary("all").unwrap();
        assert_eq!(dict.answers().len(), ANSWERS_COUNT);
        assert_eq!(dict.allowed_len(), ALLOWED_COUNT);
    }

    #[test]
    fn answers_mode_restricts_guesses() {
        let dict = load_dictionary("answers").unwrap();
        assert_eq!(dict.allowed_len(), ANSWERS_COUNT);
        for &answer in ANSWERS {
            assert!(dict.is_valid_guess(answer));
        }
    }

    #[test]
    fn file_mode_reads_guesses() {
        let path = std::env::temp_dir().join(format!("wordle_chain_list_{}.txt", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# custom\nzesty\nquirk").unwrap();
        drop(file);

        let dict = load_dictionary(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(dict.allowed_len(), 2);
        assert!(dict.is_valid_guess("zesty"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_dictionary("/definitely/not/here.txt").is_err());
    }

    #[test]
    fn resolve_parses_date() {
        let config =
            AppConfig::resolve("answers", Some("2022-01-01"), RelayConfig::default(), None).unwrap();
        assert_eq!(config.date, GameDate::new(2022, 1, 1).unwrap());
        assert!(AppConfig::resolve("answers", Some("01/01/2022"), RelayConfig::default(), None).is_err());
    }
}
