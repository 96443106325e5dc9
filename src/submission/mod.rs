//! Submission gate
//!
//! Everything between a finished board and a stored score: encryption,
//! the sign-in handshake, the relay and the chain-side collaborators.

pub mod auth;
pub mod chain;
pub mod client;
pub mod relay;
pub mod vault;

pub use auth::{
    AuthError, DevKeyring, DevWallet, MESSAGE_VERSION, NonceIssuer, NonceToken, SignInMessage, Signature,
    SignatureVerifier, Signer,
};
pub use chain::{
    ContractError, Indexer, IndexerError, MemoryLedger, Page, ScoreContract, ScoreRecord,
    ScoreSubmission, fetch_all,
};
pub use client::{SubmissionClient, SubmitError};
pub use relay::{Relay, RelayConfig, RelayError, RelayOutcome, RelayServer, SubmitRequest};
pub use vault::{Credentials, EncryptedBlob, Encryptor, LocalVault, VaultError, data_hash};

use chrono::Utc;

/// Current unix time in seconds
#[must_use]
pub fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
