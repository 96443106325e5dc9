//! End-of-game handoff
//!
//! A finished daily game is encrypted, signed and relayed to an in-process
//! ledger. With a snapshot path the ledger is seeded from that file and every
//! stored record is written back, so `results` can read it and a later run
//! sees earlier submissions.

use super::SnapshotIndexer;
use crate::game::{GameSession, puzzle_number};
use crate::submission::{
    DevKeyring, DevWallet, LocalVault, MemoryLedger, RelayConfig, RelayOutcome, RelayServer,
    ScoreContract, ScoreRecord, ScoreSubmission, Signer, SubmissionClient, now_secs,
};
use crate::wordlists::WordSource;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to one handed-off game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub game_id: i64,
    pub token_id: u64,
    pub wallet: String,
    pub outcome: RelayOutcome,
}

impl fmt::Display for SubmitReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            RelayOutcome::Recorded => write!(
                f,
                "Score for puzzle #{} submitted with token {}",
                self.game_id, self.token_id
            ),
            RelayOutcome::AlreadySubmitted => write!(
                f,
                "Token {} already has a score for puzzle #{}",
                self.token_id, self.game_id
            ),
        }
    }
}

/// Submits finished games for one wallet and token
pub struct LocalSubmitter {
    config: RelayConfig,
    vault: LocalVault,
    vault_secret: String,
    wallet: DevWallet,
    token_id: u64,
    ledger: MemoryLedger,
    snapshot: Option<PathBuf>,
}

impl LocalSubmitter {
    /// # Errors
    /// Fails on a malformed vault secret or wallet key, or an unreadable
    /// snapshot.
    pub fn new(
        config: RelayConfig,
        vault_secret: Option<&str>,
        wallet_key: Option<&str>,
        token_id: u64,
        snapshot: Option<PathBuf>,
    ) -> Result<Self> {
        let vault_secret = match vault_secret {
            Some(hex_secret) => hex_secret.trim().to_string(),
            None => hex::encode(rand::random::<[u8; 32]>()),
        };
        let vault = LocalVault::from_hex(&vault_secret).context("invalid vault secret")?;
        let wallet = match wallet_key {
            Some(key) => DevWallet::new(parse_key(key)?),
            None => DevWallet::random(),
        };

        let ledger = MemoryLedger::new();
        if let Some(path) = snapshot.as_deref().filter(|p| p.exists()) {
            seed_ledger(&ledger, path)?;
        }
        ledger.mint(token_id, &wallet.address())?;

        Ok(Self {
            config,
            vault,
            vault_secret,
            wallet,
            token_id,
            ledger,
            snapshot,
        })
    }

    #[must_use]
    pub fn vault_secret(&self) -> &str {
        &self.vault_secret
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    #[must_use]
    pub fn wallet_address(&self) -> String {
        self.wallet.address()
    }

    /// Everything the ledger holds, seeded records included
    ///
    /// # Errors
    /// Fails if the ledger is unavailable.
    pub fn records(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.ledger.records()?)
    }

    /// Hand a finished session to the relay
    ///
    /// # Errors
    /// Fails if the game is unfinished, the relay rejects the submission or
    /// the snapshot cannot be written.
    pub fn submit<S: WordSource + ?Sized>(
        &self,
        session: &mut GameSession<'_, S>,
    ) -> Result<SubmitReceipt> {
        let mut keyring = DevKeyring::new();
        keyring.register(&self.wallet);
        let relay = RelayServer::new(self.config.clone(), keyring, &self.ledger, &self.ledger);
        let client = SubmissionClient::new(self.config.clone(), &self.vault, &relay, &self.wallet);

        let outcome = client.submit(session, self.token_id, now_secs())?;
        let receipt = SubmitReceipt {
            game_id: puzzle_number(session.date()),
            token_id: self.token_id,
            wallet: self.wallet.address(),
            outcome,
        };
        info!("{receipt}");

        if let Some(path) = &self.snapshot {
            let json = serde_json::to_string_pretty(&self.records()?)?;
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            debug!("snapshot written to {}", path.display());
        }
        Ok(receipt)
    }
}

fn parse_key(key: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(key.trim().trim_start_matches("0x")).context("wallet key is not hex")?;
    match <[u8; 32]>::try_from(bytes) {
        Ok(key) => Ok(key),
        Err(bytes) => bail!("wallet key must be 32 bytes, got {}", bytes.len()),
    }
}

fn seed_ledger(ledger: &MemoryLedger, path: &Path) -> Result<()> {
    let records = SnapshotIndexer::load(path)?.into_records();
    debug!("seeding ledger with {} records from {}", records.len(), path.display());
    for record in records {
        ledger.mint(record.token_id, &record.user)?;
        ledger.submit_score(ScoreSubmission {
            game_id: record.game_id,
            token_id: record.token_id,
            user: record.user,
            blob: record.blob,
            timestamp: record.timestamp,
        })?;
    }
    Ok(())
}
