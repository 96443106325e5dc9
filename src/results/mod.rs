//! Results pipeline
//!
//! Pulls stored scores for a game from the indexer, decrypts them in
//! parallel and decodes each code back into match-state rows.

use crate::core::{MAX_ROWS, StateRow, TileState, decode};
use crate::submission::{
    Credentials, Encryptor, Indexer, IndexerError, ScoreRecord, fetch_all,
};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Records requested per indexer page
pub const PAGE_SIZE: usize = 100;

/// One decrypted score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub user: String,
    pub token_id: u64,
    pub game_id: i64,
    pub timestamp: u64,
    pub code: String,
    #[serde(skip)]
    pub rows: Vec<StateRow>,
}

impl ResultEntry {
    /// Rows used on a win, `None` if the board never went all green
    #[must_use]
    pub fn solved_in(&self) -> Option<usize> {
        self.rows
            .last()
            .filter(|row| row.iter().all(|&s| s == TileState::Correct))
            .map(|_| self.rows.len())
    }
}

/// Decrypted entries plus the number of records that could not be decrypted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub entries: Vec<ResultEntry>,
    pub failed: usize,
}

/// All stored records for `game_id`; an empty `wallets` slice means every wallet
///
/// # Errors
/// Returns the first indexer error.
pub fn fetch_records<I: Indexer + ?Sized>(
    indexer: &I,
    game_id: i64,
    wallets: &[String],
) -> Result<Vec<ScoreRecord>, IndexerError> {
    let records = fetch_all(PAGE_SIZE, |page| {
        indexer.scores_for_game(game_id, wallets, page)
    })?;
    debug!("fetched {} records for game {game_id}", records.len());
    Ok(records)
}

/// Decrypt and decode `records` in parallel
///
/// `on_progress` runs once per record, from worker threads. Records that fail
/// to decrypt are logged and counted, not returned. Entry order is not
/// guaranteed.
pub fn decrypt_all<E, F>(
    records: &[ScoreRecord],
    vault: &E,
    credentials: &Credentials,
    on_progress: F,
) -> FetchReport
where
    E: Encryptor + Sync + ?Sized,
    F: Fn() + Sync,
{
    let decrypted: Vec<Option<ResultEntry>> = records
        .par_iter()
        .map(|record| {
            let entry = match vault.decrypt(&record.blob, credentials) {
                Ok(code) => Some(ResultEntry {
                    rows: decode(&code),
                    user: record.user.clone(),
                    token_id: record.token_id,
                    game_id: record.game_id,
                    timestamp: record.timestamp,
                    code,
                }),
                Err(e) => {
                    warn!("skipping record for token {}: {e}", record.token_id);
                    None
                }
            };
            on_progress();
            entry
        })
        .collect();

    let failed = decrypted.iter().filter(|e| e.is_none()).count();
    FetchReport {
        entries: decrypted.into_iter().flatten().collect(),
        failed,
    }
}

/// Fetch, decrypt and decode every score for `game_id`
///
/// # Errors
/// Returns the first indexer error; decryption failures are counted instead.
pub fn fetch_results<I, E>(
    indexer: &I,
    vault: &E,
    credentials: &Credentials,
    game_id: i64,
    wallets: &[String],
) -> Result<FetchReport, IndexerError>
where
    I: Indexer + ?Sized,
    E: Encryptor + Sync + ?Sized,
{
    let records = fetch_records(indexer, game_id, wallets)?;
    Ok(decrypt_all(&records, vault, credentials, || {}))
}

/// Entries per user, each list sorted by timestamp
#[must_use]
pub fn group_by_user(entries: &[ResultEntry]) -> BTreeMap<String, Vec<ResultEntry>> {
    let mut groups: BTreeMap<String, Vec<ResultEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.user.clone()).or_default().push(entry.clone());
    }
    for list in groups.values_mut() {
        list.sort_by_key(|e| (e.timestamp, e.token_id));
    }
    groups
}

/// Win distribution over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    /// `solved[n]` counts wins in `n + 1` rows
    pub solved: [usize; MAX_ROWS],
    pub unsolved: usize,
}

impl Distribution {
    #[must_use]
    pub fn from_entries(entries: &[ResultEntry]) -> Self {
        let mut dist = Self::default();
        for entry in entries {
            match entry.solved_in() {
                Some(rows) if (1..=MAX_ROWS).contains(&rows) => dist.solved[rows - 1] += 1,
                _ => dist.unsolved += 1,
            }
        }
        dist
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.solved.iter().sum::<usize>() + self.unsolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EncodedResult;
    use crate::submission::{LocalVault, MemoryLedger, ScoreContract, ScoreSubmission};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store(ledger: &MemoryLedger, vault: &LocalVault, token_id: u64, user: &str, code: &str, ts: u64) {
        let code: EncodedResult = code.parse().unwrap();
        ledger
            .submit_score(ScoreSubmission {
                game_id: 5,
                token_id,
                user: user.to_string(),
                blob: vault.encrypt(&code).unwrap(),
                timestamp: ts,
            })
            .unwrap();
    }

    #[test]
    fn decrypts_and_groups() {
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([1; 32]);
        store(&ledger, &vault, 1, "0xa", "XXYXXGGGGG", 20);
        store(&ledger, &vault, 2, "0xa", "GGGGG", 10);
        store(&ledger, &vault, 3, "0xb", "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXX", 15);

        let report = fetch_results(&ledger, &vault, &vault.grant("0xreader"), 5, &[]).unwrap();
        assert_eq!(report.failed, 0);
        assert_eq!(report.entries.len(), 3);

        let groups = group_by_user(&report.entries);
        assert_eq!(groups.len(), 2);
        let a: Vec<u64> = groups["0xa"].iter().map(|e| e.token_id).collect();
        assert_eq!(a, vec![2, 1]);
        assert_eq!(groups["0xa"][1].rows.len(), 2);
        assert_eq!(groups["0xa"][1].solved_in(), Some(2));
        assert_eq!(groups["0xb"][0].solved_in(), None);
    }

    #[test]
    fn undecryptable_records_skipped() {
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([1; 32]);
        let stranger = LocalVault::new([2; 32]);
        store(&ledger, &vault, 1, "0xa", "GGGGG", 1);
        store(&ledger, &stranger, 2, "0xb", "GGGGG", 2);

        let report = fetch_results(&ledger, &vault, &vault.grant("0xreader"), 5, &[]).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].token_id, 1);
    }

    #[test]
    fn progress_called_per_record() {
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([1; 32]);
        for token in 0..250 {
            store(&ledger, &vault, token, "0xa", "GGGGG", token);
        }
        let records = fetch_records(&ledger, 5, &[]).unwrap();
        assert_eq!(records.len(), 250);

        let seen = AtomicUsize::new(0);
        let report = decrypt_all(&records, &vault, &vault.grant("0xreader"), || {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seen.load(Ordering::Relaxed), 250);
        assert_eq!(report.entries.len(), 250);
    }

    #[test]
    fn wallet_filter_applies() {
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([1; 32]);
        store(&ledger, &vault, 1, "0xa", "GGGGG", 1);
        store(&ledger, &vault, 2, "0xb", "GGGGG", 2);

        let report =
            fetch_results(&ledger, &vault, &vault.grant("0xreader"), 5, &["0xb".to_string()]).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].user, "0xb");
    }

    #[test]
    fn distribution_counts() {
        let entry = |code: &str| ResultEntry {
            user: "0xa".to_string(),
            token_id: 0,
            game_id: 5,
            timestamp: 0,
            code: code.to_string(),
            rows: decode(code),
        };
        let entries = vec![entry("GGGGG"), entry("XXXXXGGGGG"), entry("XXXXXGGGGG"), entry("XXXXX")];
        let dist = Distribution::from_entries(&entries);
        assert_eq!(dist.solved[0], 1);
        assert_eq!(dist.solved[1], 2);
        assert_eq!(dist.unsolved, 1);
        assert_eq!(dist.total(), 4);
    }
}
