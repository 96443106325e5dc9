//! Relay server
//!
//! Accepts signed score submissions, checks the sign-in handshake and token
//! ownership, then forwards the encrypted score to the contract.

use super::auth::{
    AuthError, MESSAGE_VERSION, NonceIssuer, NonceToken, SignInMessage, Signature,
    SignatureVerifier,
};
use super::chain::{
    ContractError, Indexer, IndexerError, ScoreContract, ScoreSubmission, fetch_all,
};
use super::vault::EncryptedBlob;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

const TOKEN_PAGE_SIZE: usize = 100;

/// Settings shared by the relay and its clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub domain: String,
    pub uri: String,
    pub statement: String,
    pub chain_id: u64,
    pub nonce_ttl_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            domain: "wordle.local".to_string(),
            uri: "http://wordle.local".to_string(),
            statement: "Submit my Wordle score".to_string(),
            chain_id: 137,
            nonce_ttl_secs: 300,
        }
    }
}

/// A signed submission as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub message: String,
    pub signature: Signature,
    pub token: NonceToken,
    pub game_id: i64,
    pub token_id: u64,
    pub blob: EncryptedBlob,
}

/// What the relay did with an accepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Recorded,
    /// The contract already holds a score for this token and game
    AlreadySubmitted,
}

/// Error type for rejected submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    Auth(AuthError),
    Indexer(IndexerError),
    Contract(ContractError),
    NotTokenHolder { wallet: String, token_id: u64 },
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(e) => write!(f, "Authentication failed: {e}"),
            Self::Indexer(e) => write!(f, "{e}"),
            Self::Contract(e) => write!(f, "{e}"),
            Self::NotTokenHolder { wallet, token_id } => {
                write!(f, "Wallet {wallet} does not hold token {token_id}")
            }
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Auth(e) => Some(e),
            Self::Indexer(e) => Some(e),
            Self::Contract(e) => Some(e),
            Self::NotTokenHolder { .. } => None,
        }
    }
}

impl From<AuthError> for RelayError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl From<IndexerError> for RelayError {
    fn from(e: IndexerError) -> Self {
        Self::Indexer(e)
    }
}

/// The client's view of a relay
pub trait Relay {
    /// Hand out a fresh nonce token
    fn nonce_token(&self, now: u64) -> NonceToken;

    /// # Errors
    /// Returns `RelayError` when the request is rejected.
    fn handle(&self, request: &SubmitRequest, now: u64) -> Result<RelayOutcome, RelayError>;
}

/// In-process relay over injected collaborators
pub struct RelayServer<'a, V, I: ?Sized, C: ?Sized> {
    config: RelayConfig,
    issuer: NonceIssuer,
    verifier: V,
    indexer: &'a I,
    contract: &'a C,
    /// Accepted nonces and the expiry of their tokens
    used_nonces: Mutex<FxHashMap<String, u64>>,
}

impl<'a, V, I, C> RelayServer<'a, V, I, C>
where
    V: SignatureVerifier,
    I: Indexer + ?Sized,
    C: ScoreContract + ?Sized,
{
    /// Relay with a random nonce-signing secret
    #[must_use]
    pub fn new(config: RelayConfig, verifier: V, indexer: &'a I, contract: &'a C) -> Self {
        Self::with_secret(config, rand::random(), verifier, indexer, contract)
    }

    #[must_use]
    pub fn with_secret(
        config: RelayConfig,
        secret: [u8; 32],
        verifier: V,
        indexer: &'a I,
        contract: &'a C,
    ) -> Self {
        let issuer = NonceIssuer::new(secret, config.nonce_ttl_secs);
        Self {
            config,
            issuer,
            verifier,
            indexer,
            contract,
            used_nonces: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn authenticate(&self, request: &SubmitRequest, now: u64) -> Result<SignInMessage, AuthError> {
        self.issuer.verify(&request.token, now)?;

        let message = SignInMessage::parse(&request.message)?;
        if message.nonce != request.token.nonce {
            return Err(AuthError::NonceMismatch);
        }
        if message.domain != self.config.domain {
            return Err(AuthError::WrongDomain {
                expected: self.config.domain.clone(),
                found: message.domain,
            });
        }
        if message.chain_id != self.config.chain_id {
            return Err(AuthError::MalformedMessage(format!(
                "chain id {} does not match {}",
                message.chain_id, self.config.chain_id
            )));
        }
        if message.uri != self.config.uri {
            return Err(AuthError::FieldMismatch {
                field: "uri",
                expected: self.config.uri.clone(),
                found: message.uri,
            });
        }
        if message.version != MESSAGE_VERSION {
            return Err(AuthError::FieldMismatch {
                field: "version",
                expected: MESSAGE_VERSION.to_string(),
                found: message.version,
            });
        }
        if message.issued_at < request.token.issued_at || message.issued_at > now {
            return Err(AuthError::IssuedAtOutOfRange {
                issued_at: message.issued_at,
            });
        }
        if message.expiration_time.is_some_and(|exp| now > exp) {
            return Err(AuthError::MessageExpired);
        }
        if !self
            .verifier
            .verify(&request.message, &request.signature, &message.address)
        {
            return Err(AuthError::BadSignature);
        }

        let mut used = self
            .used_nonces
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Tokens past expiry fail verification, so their nonces need no tracking
        used.retain(|_, expires_at| *expires_at >= now);
        if used.contains_key(&message.nonce) {
            return Err(AuthError::NonceReused);
        }
        used.insert(message.nonce.clone(), request.token.expires_at);
        Ok(message)
    }

    #[cfg(test)]
    fn tracked_nonces(&self) -> usize {
        self.used_nonces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn holds_token(&self, wallet: &str, token_id: u64) -> Result<bool, IndexerError> {
        let tokens = fetch_all(TOKEN_PAGE_SIZE, |page| self.indexer.tokens_of(wallet, page))?;
        Ok(tokens.contains(&token_id))
    }
}

impl<V, I, C> Relay for RelayServer<'_, V, I, C>
where
    V: SignatureVerifier,
    I: Indexer + ?Sized,
    C: ScoreContract + ?Sized,
{
    fn nonce_token(&self, now: u64) -> NonceToken {
        self.issuer.issue(now)
    }

    fn handle(&self, request: &SubmitRequest, now: u64) -> Result<RelayOutcome, RelayError> {
        let message = self.authenticate(request, now).inspect_err(|e| {
            warn!("rejected submission for token {}: {e}", request.token_id);
        })?;

        if !self.holds_token(&message.address, request.token_id)? {
            warn!(
                "{} tried to submit with token {} it does not hold",
                message.address, request.token_id
            );
            return Err(RelayError::NotTokenHolder {
                wallet: message.address,
                token_id: request.token_id,
            });
        }

        let submission = ScoreSubmission {
            game_id: request.game_id,
            token_id: request.token_id,
            user: message.address,
            blob: request.blob.clone(),
            timestamp: now,
        };
        match self.contract.submit_score(submission) {
            Ok(()) => {
                info!(
                    "recorded score for token {} game {}",
                    request.token_id, request.game_id
                );
                Ok(RelayOutcome::Recorded)
            }
            Err(ContractError::AlreadySubmitted { .. }) => {
                info!(
                    "token {} already submitted for game {}",
                    request.token_id, request.game_id
                );
                Ok(RelayOutcome::AlreadySubmitted)
            }
            Err(e) => Err(RelayError::Contract(e)),
        }
    }
}
