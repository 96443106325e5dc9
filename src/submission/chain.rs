//! Chain-side collaborators
//!
//! [`ScoreContract`] stores encrypted scores; [`Indexer`] answers paginated
//! read queries about token ownership and stored scores. [`MemoryLedger`]
//! implements both in process.

use super::vault::EncryptedBlob;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

/// A score as submitted to the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub game_id: i64,
    pub token_id: u64,
    pub user: String,
    pub blob: EncryptedBlob,
    pub timestamp: u64,
}

/// A stored score as returned by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub user: String,
    pub token_id: u64,
    pub game_id: i64,
    pub timestamp: u64,
    #[serde(flatten)]
    pub blob: EncryptedBlob,
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub first: usize,
    pub skip: usize,
}

impl Page {
    #[must_use]
    pub const fn new(first: usize) -> Self {
        Self { first, skip: 0 }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            first: self.first,
            skip: self.skip + self.first,
        }
    }
}

/// Error type for contract calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// This token already has a score for this game
    AlreadySubmitted { token_id: u64, game_id: i64 },
    Unavailable(String),
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySubmitted { token_id, game_id } => {
                write!(f, "Token {token_id} already submitted for game {game_id}")
            }
            Self::Unavailable(reason) => write!(f, "Contract unavailable: {reason}"),
        }
    }
}

impl std::error::Error for ContractError {}

/// Error type for indexer queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    Unavailable(String),
}

impl fmt::Display for IndexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "Indexer unavailable: {reason}"),
        }
    }
}

impl std::error::Error for IndexerError {}

/// Write side: the score contract
pub trait ScoreContract {
    /// # Errors
    /// `AlreadySubmitted` for a repeated `(token_id, game_id)`.
    fn submit_score(&self, submission: ScoreSubmission) -> Result<(), ContractError>;
}

/// Read side: the indexer
///
/// Results are best-effort and may lag the contract.
pub trait Indexer {
    /// Token IDs held by `wallet`
    ///
    /// # Errors
    /// Returns `IndexerError` if the query fails.
    fn tokens_of(&self, wallet: &str, page: Page) -> Result<Vec<u64>, IndexerError>;

    /// Scores stored for `game_id`; an empty `wallets` slice means every wallet
    ///
    /// # Errors
    /// Returns `IndexerError` if the query fails.
    fn scores_for_game(
        &self,
        game_id: i64,
        wallets: &[String],
        page: Page,
    ) -> Result<Vec<ScoreRecord>, IndexerError>;
}

/// Drain a paginated query until a short page comes back
///
/// # Errors
/// Returns the first error from `query`.
pub fn fetch_all<T, E>(
    page_size: usize,
    mut query: impl FnMut(Page) -> Result<Vec<T>, E>,
) -> Result<Vec<T>, E> {
    let page_size = page_size.max(1);
    let mut page = Page::new(page_size);
    let mut all = Vec::new();
    loop {
        let batch = query(page)?;
        let done = batch.len() < page_size;
        all.extend(batch);
        if done {
            return Ok(all);
        }
        page = page.next();
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    owners: FxHashMap<u64, String>,
    scores: Vec<ScoreRecord>,
}

/// In-process contract and indexer over the same state
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `token_id` to `wallet`
    ///
    /// # Errors
    /// Returns `ContractError::Unavailable` if the ledger lock is poisoned.
    pub fn mint(&self, token_id: u64, wallet: &str) -> Result<(), ContractError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| ContractError::Unavailable("ledger lock poisoned".to_string()))?;
        state.owners.insert(token_id, wallet.to_ascii_lowercase());
        Ok(())
    }

    /// Every stored score, in submission order
    ///
    /// # Errors
    /// Returns `IndexerError::Unavailable` if the ledger lock is poisoned.
    pub fn records(&self) -> Result<Vec<ScoreRecord>, IndexerError> {
        let state = self
            .state
            .read()
            .map_err(|_| IndexerError::Unavailable("ledger lock poisoned".to_string()))?;
        Ok(state.scores.clone())
    }
}

impl ScoreContract for MemoryLedger {
    fn submit_score(&self, submission: ScoreSubmission) -> Result<(), ContractError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| ContractError::Unavailable("ledger lock poisoned".to_string()))?;

        let duplicate = state
            .scores
            .iter()
            .any(|r| r.token_id == submission.token_id && r.game_id == submission.game_id);
        if duplicate {
            return Err(ContractError::AlreadySubmitted {
                token_id: submission.token_id,
                game_id: submission.game_id,
            });
        }

        debug!(
            "stored score for token {} game {}",
            submission.token_id, submission.game_id
        );
        state.scores.push(ScoreRecord {
            user: submission.user.to_ascii_lowercase(),
            token_id: submission.token_id,
            game_id: submission.game_id,
            timestamp: submission.timestamp,
            blob: submission.blob,
        });
        Ok(())
    }
}

impl Indexer for MemoryLedger {
    fn tokens_of(&self, wallet: &str, page: Page) -> Result<Vec<u64>, IndexerError> {
        let state = self
            .state
            .read()
            .map_err(|_| IndexerError::Unavailable("ledger lock poisoned".to_string()))?;
        let wallet = wallet.to_ascii_lowercase();

        let mut tokens: Vec<u64> = state
            .owners
            .iter()
            .filter(|(_, owner)| **owner == wallet)
            .map(|(&id, _)| id)
            .collect();
        tokens.sort_unstable();
        Ok(tokens.into_iter().skip(page.skip).take(page.first).collect())
    }

    fn scores_for_game(
        &self,
        game_id: i64,
        wallets: &[String],
        page: Page,
    ) -> Result<Vec<ScoreRecord>, IndexerError> {
        let state = self
            .state
            .read()
            .map_err(|_| IndexerError::Unavailable("ledger lock poisoned".to_string()))?;

        Ok(state
            .scores
            .iter()
            .filter(|r| r.game_id == game_id)
            .filter(|r| wallets.is_empty() || wallets.iter().any(|w| w.eq_ignore_ascii_case(&r.user)))
            .skip(page.skip)
            .take(page.first)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(token_id: u64, game_id: i64, user: &str) -> ScoreSubmission {
        ScoreSubmission {
            game_id,
            token_id,
            user: user.to_string(),
            blob: EncryptedBlob {
                ciphertext: "00".to_string(),
                data_to_encrypt_hash: "11".to_string(),
            },
            timestamp: 42,
        }
    }

    #[test]
    fn duplicate_submission_rejected() {
        let ledger = MemoryLedger::new();
        ledger.submit_score(submission(1, 10, "0xa")).unwrap();
        assert_eq!(
            ledger.submit_score(submission(1, 10, "0xa")),
            Err(ContractError::AlreadySubmitted {
                token_id: 1,
                game_id: 10
            })
        );
        // Same token, next game is fine
        ledger.submit_score(submission(1, 11, "0xa")).unwrap();
    }

    #[test]
    fn tokens_paginate() {
        let ledger = MemoryLedger::new();
        for id in 0..7 {
            ledger.mint(id, "0xA").unwrap();
        }
        ledger.mint(100, "0xb").unwrap();

        let first = ledger.tokens_of("0xa", Page::new(3)).unwrap();
        assert_eq!(first, vec![0, 1, 2]);
        let all = fetch_all(3, |page| ledger.tokens_of("0xa", page)).unwrap();
        assert_eq!(all, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn scores_filter_by_game_and_wallet() {
        let ledger = MemoryLedger::new();
        ledger.submit_score(submission(1, 10, "0xa")).unwrap();
        ledger.submit_score(submission(2, 10, "0xb")).unwrap();
        ledger.submit_score(submission(3, 11, "0xa")).unwrap();

        let game10 = ledger.scores_for_game(10, &[], Page::new(10)).unwrap();
        assert_eq!(game10.len(), 2);

        let only_a = ledger
            .scores_for_game(10, &["0xA".to_string()], Page::new(10))
            .unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].token_id, 1);
    }

    #[test]
    fn fetch_all_stops_on_exact_multiple() {
        let mut calls = 0;
        let items = fetch_all(2, |page| {
            calls += 1;
            Ok::<_, IndexerError>((0..4).skip(page.skip).take(page.first).collect::<Vec<u32>>())
        })
        .unwrap();
        assert_eq!(items, vec![0, 1, 2, 3]);
        // Two full pages, then an empty one
        assert_eq!(calls, 3);
    }

    #[test]
    fn record_json_is_flat() {
        let record = ScoreRecord {
            user: "0xa".to_string(),
            token_id: 7,
            game_id: 300,
            timestamp: 42,
            blob: EncryptedBlob {
                ciphertext: "00".to_string(),
                data_to_encrypt_hash: "11".to_string(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tokenId"], 7);
        assert_eq!(json["dataToEncryptHash"], "11");
        let back: ScoreRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
