//! Encryption collaborator
//!
//! Scores are encrypted before they leave the client and decrypted only by
//! holders of valid credentials. The [`Encryptor`] trait is the seam;
//! [`LocalVault`] is an in-process implementation keyed by a vault secret.

use crate::core::EncodedResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const NONCE_LEN: usize = 16;

/// Opaque encrypted score as stored on chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedBlob {
    pub ciphertext: String,
    pub data_to_encrypt_hash: String,
}

/// Proof that the caller may decrypt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub wallet: String,
    pub session_proof: String,
}

/// Error type for encryption and decryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    InvalidCredentials,
    Malformed(String),
    HashMismatch,
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Credentials rejected by vault"),
            Self::Malformed(reason) => write!(f, "Malformed ciphertext: {reason}"),
            Self::HashMismatch => write!(f, "Decrypted data does not match its hash"),
        }
    }
}

impl std::error::Error for VaultError {}

/// Encrypts score codes and decrypts them for authorized callers
pub trait Encryptor {
    /// # Errors
    /// Returns `VaultError` if the service refuses the request.
    fn encrypt(&self, result: &EncodedResult) -> Result<EncryptedBlob, VaultError>;

    /// # Errors
    /// Returns `VaultError` on bad credentials or corrupted data.
    fn decrypt(&self, blob: &EncryptedBlob, credentials: &Credentials) -> Result<String, VaultError>;
}

/// Hex SHA-256 of `data`
#[must_use]
pub fn data_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// In-process vault: SHA-256 keystream under a vault secret
///
/// Ciphertext is `hex(nonce || plaintext ^ keystream)`. Credentials are
/// granted per wallet by the vault itself.
#[derive(Clone)]
pub struct LocalVault {
    secret: [u8; 32],
}

impl fmt::Debug for LocalVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalVault").finish_non_exhaustive()
    }
}

impl LocalVault {
    #[must_use]
    pub const fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Vault with a random secret
    #[must_use]
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// Parse a 64-character hex secret
    ///
    /// # Errors
    /// Returns `VaultError::Malformed` if the secret is not 32 hex bytes.
    pub fn from_hex(secret: &str) -> Result<Self, VaultError> {
        let bytes = hex::decode(secret.trim()).map_err(|e| VaultError::Malformed(e.to_string()))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| VaultError::Malformed("vault secret must be 32 bytes".to_string()))?;
        Ok(Self::new(secret))
    }

    /// Issue decryption credentials for `wallet`
    #[must_use]
    pub fn grant(&self, wallet: &str) -> Credentials {
        Credentials {
            wallet: wallet.to_string(),
            session_proof: self.session_proof(wallet),
        }
    }

    fn session_proof(&self, wallet: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"session");
        hasher.update(self.secret);
        hasher.update(wallet.to_ascii_lowercase().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn apply_keystream(&self, nonce: &[u8], data: &mut [u8]) {
        for (counter, chunk) in data.chunks_mut(32).enumerate() {
            let mut hasher = Sha256::new();
            hasher.update(self.secret);
            hasher.update(nonce);
            hasher.update((counter as u64).to_be_bytes());
            let block = hasher.finalize();
            for (byte, key) in chunk.iter_mut().zip(block) {
                *byte ^= key;
            }
        }
    }
}

impl Encryptor for LocalVault {
    fn encrypt(&self, result: &EncodedResult) -> Result<EncryptedBlob, VaultError> {
        let plaintext = result.as_str().as_bytes();
        let nonce: [u8; NONCE_LEN] = rand::random();

        let mut body = plaintext.to_vec();
        self.apply_keystream(&nonce, &mut body);

        let mut payload = nonce.to_vec();
        payload.extend_from_slice(&body);

        Ok(EncryptedBlob {
            ciphertext: hex::encode(payload),
            data_to_encrypt_hash: data_hash(plaintext),
        })
    }

    fn decrypt(&self, blob: &EncryptedBlob, credentials: &Credentials) -> Result<String, VaultError> {
        if credentials.session_proof != self.session_proof(&credentials.wallet) {
            return Err(VaultError::InvalidCredentials);
        }

        let payload =
            hex::decode(&blob.ciphertext).map_err(|e| VaultError::Malformed(e.to_string()))?;
        if payload.len() < NONCE_LEN {
            return Err(VaultError::Malformed("ciphertext too short".to_string()));
        }
        let (nonce, body) = payload.split_at(NONCE_LEN);

        let mut plaintext = body.to_vec();
        self.apply_keystream(nonce, &mut plaintext);

        if data_hash(&plaintext) != blob.data_to_encrypt_hash {
            return Err(VaultError::HashMismatch);
        }
        String::from_utf8(plaintext).map_err(|e| VaultError::Malformed(e.to_string()))
    }
}
