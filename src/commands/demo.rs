//! End-to-end simulation
//!
//! Simulated players solve the daily puzzle, submit through the relay and the
//! stored scores are read back through the results pipeline.

use super::progress_bar;
use crate::core::{RowFeedback, Word};
use crate::game::{GameDate, GameSession, puzzle_number};
use crate::results::{FetchReport, ResultEntry, decrypt_all, fetch_records, group_by_user};
use crate::submission::{
    DevKeyring, DevWallet, LocalVault, MemoryLedger, RelayConfig, RelayOutcome, RelayServer,
    ScoreRecord, Signer, SubmissionClient, now_secs,
};
use crate::wordlists::{Dictionary, WordSource};
use anyhow::{Context, Result};
use log::{debug, info};
use rand::prelude::IndexedRandom;
use std::collections::BTreeMap;

/// What the simulation did
#[derive(Debug, Clone)]
pub struct DemoSummary {
    pub game_id: i64,
    pub players: usize,
    pub recorded: usize,
    pub already_submitted: usize,
    pub report: FetchReport,
    pub groups: BTreeMap<String, Vec<ResultEntry>>,
    /// Everything the indexer holds for the game, for `results` to reuse
    pub records: Vec<ScoreRecord>,
    /// Hex vault secret the records were encrypted under
    pub vault_secret: String,
}

/// Play one game by always guessing a random word still consistent with the
/// feedback so far
///
/// Returns the finished session.
pub fn autoplay(dictionary: &Dictionary, date: GameDate) -> GameSession<'_, Dictionary> {
    let mut session = GameSession::new(dictionary, date);
    let mut candidates: Vec<Word> = dictionary.answers().to_vec();
    let mut rng = rand::rng();

    while !session.is_locked() {
        let guess = candidates
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| dictionary.answer_for(date));

        for ch in guess.as_str().chars() {
            session.push_letter(ch);
        }
        match session.submit_row() {
            Ok(report) => {
                candidates.retain(|c| RowFeedback::evaluate(&guess, c) == report.feedback);
            }
            Err(rejection) => {
                debug!("autoplay guess {guess} rejected: {rejection}");
                while session.pop_letter().is_some() {}
                candidates.retain(|c| *c != guess);
            }
        }
    }
    session
}

/// Run the simulation with `players` wallets
///
/// # Errors
/// Fails on a bad vault secret or if a submission is rejected.
pub fn run_demo(
    dictionary: &Dictionary,
    date: GameDate,
    players: usize,
    relay_config: &RelayConfig,
    vault_secret: Option<&str>,
) -> Result<DemoSummary> {
    let secret = match vault_secret {
        Some(hex_secret) => hex_secret.trim().to_string(),
        None => hex::encode(rand::random::<[u8; 32]>()),
    };
    let vault = LocalVault::from_hex(&secret).context("invalid vault secret")?;

    let ledger = MemoryLedger::new();
    let wallets: Vec<DevWallet> = (0..players).map(|_| DevWallet::random()).collect();
    let mut keyring = DevKeyring::new();
    for (token_id, wallet) in (1u64..).zip(&wallets) {
        keyring.register(wallet);
        ledger.mint(token_id, &wallet.address())?;
    }
    let relay = RelayServer::new(relay_config.clone(), keyring, &ledger, &ledger);

    let game_id = puzzle_number(date);
    let mut recorded = 0;
    let mut already_submitted = 0;
    let mut first_session = None;

    for (token_id, wallet) in (1u64..).zip(&wallets) {
        let client = SubmissionClient::new(relay_config.clone(), &vault, &relay, wallet);
        let mut session = autoplay(dictionary, date);
        match client.submit(&mut session, token_id, now_secs())? {
            RelayOutcome::Recorded => recorded += 1,
            RelayOutcome::AlreadySubmitted => already_submitted += 1,
        }
        if first_session.is_none() {
            first_session = Some((session, token_id));
        }
    }

    // Resubmitting must come back as already submitted, not as an error
    if let (Some((mut session, token_id)), Some(wallet)) = (first_session, wallets.first()) {
        let client = SubmissionClient::new(relay_config.clone(), &vault, &relay, wallet);
        if client.submit(&mut session, token_id, now_secs())? == RelayOutcome::AlreadySubmitted {
            already_submitted += 1;
        }
    }
    info!("demo: {recorded} recorded, {already_submitted} already submitted");

    let records = fetch_records(&ledger, game_id, &[])?;
    let credentials = vault.grant("0xresults");
    let pb = progress_bar(records.len() as u64);
    let report = decrypt_all(&records, &vault, &credentials, || pb.inc(1));
    pb.finish_with_message("Decrypted");
    let groups = group_by_user(&report.entries);

    Ok(DemoSummary {
        game_id,
        players,
        recorded,
        already_submitted,
        report,
        groups,
        records,
        vault_secret: secret,
    })
}
