//! Client side of score submission

use super::auth::{MESSAGE_VERSION, SignInMessage, Signer};
use super::relay::{Relay, RelayConfig, RelayError, RelayOutcome, SubmitRequest};
use super::vault::{Encryptor, VaultError};
use crate::game::{GameSession, puzzle_number};
use crate::wordlists::WordSource;
use log::{debug, info};
use std::fmt;

/// Error type for a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The session has no result yet
    NotFinished,
    Vault(VaultError),
    Relay(RelayError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinished => write!(f, "The game is not finished"),
            Self::Vault(e) => write!(f, "Encryption failed: {e}"),
            Self::Relay(e) => write!(f, "Relay rejected submission: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFinished => None,
            Self::Vault(e) => Some(e),
            Self::Relay(e) => Some(e),
        }
    }
}

impl From<VaultError> for SubmitError {
    fn from(e: VaultError) -> Self {
        Self::Vault(e)
    }
}

impl From<RelayError> for SubmitError {
    fn from(e: RelayError) -> Self {
        Self::Relay(e)
    }
}

/// Encrypts, signs and relays finished games for one wallet
pub struct SubmissionClient<'a, E: ?Sized, R: ?Sized, W: ?Sized> {
    config: RelayConfig,
    encryptor: &'a E,
    relay: &'a R,
    wallet: &'a W,
}

impl<'a, E, R, W> SubmissionClient<'a, E, R, W>
where
    E: Encryptor + ?Sized,
    R: Relay + ?Sized,
    W: Signer + ?Sized,
{
    #[must_use]
    pub const fn new(config: RelayConfig, encryptor: &'a E, relay: &'a R, wallet: &'a W) -> Self {
        Self {
            config,
            encryptor,
            relay,
            wallet,
        }
    }

    /// Submit the session's result under `token_id`
    ///
    /// A score the contract already holds counts as success and comes back as
    /// `RelayOutcome::AlreadySubmitted`. The session's signature prompt flag
    /// is open only while the message is being signed.
    ///
    /// # Errors
    /// `NotFinished` before the game ends, otherwise the vault or relay error.
    pub fn submit<S: WordSource + ?Sized>(
        &self,
        session: &mut GameSession<'_, S>,
        token_id: u64,
        now: u64,
    ) -> Result<RelayOutcome, SubmitError> {
        let result = session.result().cloned().ok_or(SubmitError::NotFinished)?;
        let game_id = puzzle_number(session.date());

        let blob = self.encryptor.encrypt(&result)?;
        let token = self.relay.nonce_token(now);
        let message = SignInMessage {
            domain: self.config.domain.clone(),
            address: self.wallet.address(),
            statement: self.config.statement.clone(),
            uri: self.config.uri.clone(),
            version: MESSAGE_VERSION.to_string(),
            chain_id: self.config.chain_id,
            nonce: token.nonce.clone(),
            issued_at: now,
            expiration_time: Some(token.expires_at),
        }
        .to_text();

        session.set_signature_prompt(true);
        let signature = self.wallet.sign(&message);
        session.set_signature_prompt(false);
        debug!("signed submission for game {game_id}");

        let request = SubmitRequest {
            message,
            signature,
            token,
            game_id,
            token_id,
            blob,
        };
        let outcome = self.relay.handle(&request, now)?;
        info!("game {game_id} submitted with token {token_id}: {outcome:?}");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EPOCH;
    use crate::submission::auth::{DevKeyring, DevWallet};
    use crate::submission::chain::{Indexer, MemoryLedger, Page};
    use crate::submission::relay::RelayServer;
    use crate::submission::vault::LocalVault;
    use crate::wordlists::Dictionary;
    use crate::wordlists::loader::words_from_slice;

    const NOW: u64 = 1_650_000_000;

    fn dictionary() -> Dictionary {
        Dictionary::new(words_from_slice(&["cigar"]), words_from_slice(&["crane"])).unwrap()
    }

    fn finished_session(dict: &Dictionary) -> GameSession<'_, Dictionary> {
        let mut session = GameSession::new(dict, EPOCH);
        for word in ["crane", "cigar"] {
            for ch in word.chars() {
                session.push_letter(ch);
            }
            session.submit_row().unwrap();
        }
        session
    }

    #[test]
    fn submit_round_trip_and_duplicate() {
        let dict = dictionary();
        let wallet = DevWallet::new([9; 32]);
        let mut keyring = DevKeyring::new();
        keyring.register(&wallet);
        let ledger = MemoryLedger::new();
        ledger.mint(1, &wallet.address()).unwrap();
        let vault = LocalVault::new([3; 32]);
        let config = RelayConfig::default();
        let relay = RelayServer::new(config.clone(), keyring, &ledger, &ledger);
        let client = SubmissionClient::new(config, &vault, &relay, &wallet);

        let mut session = finished_session(&dict);
        assert_eq!(client.submit(&mut session, 1, NOW), Ok(RelayOutcome::Recorded));
        assert!(!session.signature_prompt_open());

        // Resubmitting is not an error
        assert_eq!(
            client.submit(&mut session, 1, NOW + 1),
            Ok(RelayOutcome::AlreadySubmitted)
        );

        let stored = ledger.scores_for_game(0, &[], Page::new(10)).unwrap();
        assert_eq!(stored.len(), 1);
        let plain = vault
            .decrypt(&stored[0].blob, &vault.grant(&wallet.address()))
            .unwrap();
        assert_eq!(plain, session.result().unwrap().as_str());
    }

    #[test]
    fn unfinished_game_not_submitted() {
        let dict = dictionary();
        let wallet = DevWallet::new([9; 32]);
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([3; 32]);
        let config = RelayConfig::default();
        let relay = RelayServer::new(config.clone(), DevKeyring::new(), &ledger, &ledger);
        let client = SubmissionClient::new(config, &vault, &relay, &wallet);

        let mut session = GameSession::new(&dict, EPOCH);
        assert_eq!(
            client.submit(&mut session, 1, NOW),
            Err(SubmitError::NotFinished)
        );
    }

    #[test]
    fn relay_rejection_surfaces() {
        let dict = dictionary();
        let wallet = DevWallet::new([9; 32]);
        let mut keyring = DevKeyring::new();
        keyring.register(&wallet);
        // No token minted for this wallet
        let ledger = MemoryLedger::new();
        let vault = LocalVault::new([3; 32]);
        let config = RelayConfig::default();
        let relay = RelayServer::new(config.clone(), keyring, &ledger, &ledger);
        let client = SubmissionClient::new(config, &vault, &relay, &wallet);

        let mut session = finished_session(&dict);
        assert!(matches!(
            client.submit(&mut session, 1, NOW),
            Err(SubmitError::Relay(RelayError::NotTokenHolder { .. }))
        ));
        assert!(!session.signature_prompt_open());
    }
}
