//! Decrypt and tabulate a snapshot of stored scores
//!
//! The snapshot is the JSON array of indexer records written by the `demo`
//! command or exported from an indexer.

use super::progress_bar;
use crate::results::{FetchReport, ResultEntry, decrypt_all, fetch_records, group_by_user};
use crate::submission::{
    Indexer, IndexerError, LocalVault, Page, ScoreRecord,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Indexer over a fixed list of records
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndexer {
    records: Vec<ScoreRecord>,
}

impl SnapshotIndexer {
    #[must_use]
    pub const fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    /// # Errors
    /// Fails if the file cannot be read or is not a JSON record array.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let records: Vec<ScoreRecord> = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self::new(records))
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ScoreRecord> {
        self.records
    }
}

impl Indexer for SnapshotIndexer {
    fn tokens_of(&self, wallet: &str, page: Page) -> Result<Vec<u64>, IndexerError> {
        let mut tokens: Vec<u64> = self
            .records
            .iter()
            .filter(|r| r.user.eq_ignore_ascii_case(wallet))
            .map(|r| r.token_id)
            .collect();
        tokens.sort_unstable();
        tokens.dedup();
        Ok(tokens.into_iter().skip(page.skip).take(page.first).collect())
    }

    fn scores_for_game(
        &self,
        game_id: i64,
        wallets: &[String],
        page: Page,
    ) -> Result<Vec<ScoreRecord>, IndexerError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.game_id == game_id)
            .filter(|r| wallets.is_empty() || wallets.iter().any(|w| w.eq_ignore_ascii_case(&r.user)))
            .skip(page.skip)
            .take(page.first)
            .cloned()
            .collect())
    }
}

/// Decrypted results for one game
#[derive(Debug, Clone)]
pub struct ResultsSummary {
    pub game_id: i64,
    pub report: FetchReport,
    pub groups: BTreeMap<String, Vec<ResultEntry>>,
}

/// Fetch, decrypt and group every score for `game_id`
///
/// # Errors
/// Fails on a bad vault secret or an indexer error.
pub fn collect_results<I: Indexer + ?Sized>(
    indexer: &I,
    vault_secret: &str,
    reader: &str,
    game_id: i64,
    wallets: &[String],
) -> Result<ResultsSummary> {
    let vault = LocalVault::from_hex(vault_secret).context("invalid vault secret")?;
    let credentials = vault.grant(reader);

    let records = fetch_records(indexer, game_id, wallets)?;
    let pb = progress_bar(records.len() as u64);
    let report = decrypt_all(&records, &vault, &credentials, || pb.inc(1));
    pb.finish_with_message("Decrypted");

    let groups = group_by_user(&report.entries);
    Ok(ResultsSummary {
        game_id,
        report,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EncodedResult;
    use crate::submission::{EncryptedBlob, Encryptor};

    fn record(vault: &LocalVault, token_id: u64, user: &str, game_id: i64, code: &str) -> ScoreRecord {
        let code: EncodedResult = code.parse().unwrap();
        ScoreRecord {
            user: user.to_string(),
            token_id,
            game_id,
            timestamp: token_id,
            blob: vault.encrypt(&code).unwrap(),
        }
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let vault = LocalVault::new([4; 32]);
        let records = vec![record(&vault, 1, "0xa", 9, "GGGGG")];
        let path = std::env::temp_dir().join(format!("wordle_chain_snapshot_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let snapshot = SnapshotIndexer::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(snapshot.tokens_of("0xA", Page::new(10)).unwrap(), vec![1]);
    }

    #[test]
    fn collect_filters_game_and_counts_failures() {
        let vault = LocalVault::new([4; 32]);
        let mut records = vec![
            record(&vault, 1, "0xa", 9, "XXXXXGGGGG"),
            record(&vault, 2, "0xb", 9, "GGGGG"),
            record(&vault, 3, "0xa", 10, "GGGGG"),
        ];
        records.push(ScoreRecord {
            user: "0xc".to_string(),
            token_id: 4,
            game_id: 9,
            timestamp: 4,
            blob: EncryptedBlob {
                ciphertext: "00".to_string(),
                data_to_encrypt_hash: "11".to_string(),
            },
        });
        let snapshot = SnapshotIndexer::new(records);

        let summary = collect_results(&snapshot, &hex::encode([4; 32]), "0xreader", 9, &[]).unwrap();
        assert_eq!(summary.report.entries.len(), 2);
        assert_eq!(summary.report.failed, 1);
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.groups["0xa"][0].solved_in(), Some(2));
    }

    #[test]
    fn bad_secret_is_an_error() {
        let snapshot = SnapshotIndexer::default();
        assert!(collect_results(&snapshot, "nope", "0xreader", 9, &[]).is_err());
    }
}
