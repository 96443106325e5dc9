//! Sign-in handshake
//!
//! The relay issues a MAC'd nonce token; the client signs a SIWE-style
//! message embedding that nonce; the relay checks both before it accepts a
//! score. Signing itself sits behind [`Signer`] and [`SignatureVerifier`].

use chrono::{DateTime, SecondsFormat, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";

/// Message format version written and accepted
pub const MESSAGE_VERSION: &str = "1";

/// Error type for the handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MalformedMessage(String),
    BadToken,
    TokenExpired,
    MessageExpired,
    NonceMismatch,
    NonceReused,
    WrongDomain { expected: String, found: String },
    /// A signed field other than the domain differs from what the relay expects
    FieldMismatch {
        field: &'static str,
        expected: String,
        found: String,
    },
    /// Issued before its nonce token or after the time of submission
    IssuedAtOutOfRange { issued_at: u64 },
    BadSignature,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedMessage(reason) => write!(f, "Malformed sign-in message: {reason}"),
            Self::BadToken => write!(f, "Nonce token failed verification"),
            Self::TokenExpired => write!(f, "Nonce token expired"),
            Self::MessageExpired => write!(f, "Sign-in message expired"),
            Self::NonceMismatch => write!(f, "Message nonce does not match token"),
            Self::NonceReused => write!(f, "Nonce already used"),
            Self::WrongDomain { expected, found } => {
                write!(f, "Message is for domain {found}, expected {expected}")
            }
            Self::FieldMismatch {
                field,
                expected,
                found,
            } => write!(f, "Message {field} is '{found}', expected '{expected}'"),
            Self::IssuedAtOutOfRange { issued_at } => write!(
                f,
                "Message issued at {} is outside the nonce window",
                format_timestamp(*issued_at)
            ),
            Self::BadSignature => write!(f, "Signature does not match address"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Format unix seconds as RFC 3339 in UTC, e.g. `2021-06-19T00:00:00Z`
#[must_use]
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse any RFC 3339 timestamp to unix seconds
///
/// Fractional seconds are dropped and offsets are applied.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<u64> {
    let parsed = DateTime::parse_from_rfc3339(text).ok()?;
    u64::try_from(parsed.timestamp()).ok()
}

/// SIWE-style sign-in message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInMessage {
    pub domain: String,
    pub address: String,
    pub statement: String,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: u64,
    pub expiration_time: Option<u64>,
}

impl SignInMessage {
    /// Canonical text that gets signed
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{}{HEADER_SUFFIX}\n{}\n\n{}\n\nURI: {}\nVersion: {}\nChain ID: {}\nNonce: {}\nIssued At: {}",
            self.domain,
            self.address,
            self.statement,
            self.uri,
            self.version,
            self.chain_id,
            self.nonce,
            format_timestamp(self.issued_at),
        );
        if let Some(exp) = self.expiration_time {
            text.push_str("\nExpiration Time: ");
            text.push_str(&format_timestamp(exp));
        }
        text
    }

    /// Parse the canonical text form
    ///
    /// # Errors
    /// Returns `AuthError::MalformedMessage` naming the first problem found.
    pub fn parse(text: &str) -> Result<Self, AuthError> {
        let malformed = |reason: &str| AuthError::MalformedMessage(reason.to_string());
        let mut lines = text.lines();

        let domain = lines
            .next()
            .and_then(|l| l.strip_suffix(HEADER_SUFFIX))
            .filter(|d| !d.is_empty())
            .ok_or_else(|| malformed("missing header"))?;
        let address = lines
            .next()
            .filter(|a| a.starts_with("0x"))
            .ok_or_else(|| malformed("missing address"))?;
        if lines.next() != Some("") {
            return Err(malformed("expected blank line after address"));
        }
        let statement = lines.next().ok_or_else(|| malformed("missing statement"))?;
        if lines.next() != Some("") {
            return Err(malformed("expected blank line after statement"));
        }

        let mut fields: FxHashMap<&str, &str> = FxHashMap::default();
        for line in lines {
            let (key, value) = line
                .split_once(": ")
                .ok_or_else(|| malformed("field without ': '"))?;
            fields.insert(key, value);
        }
        let field = |key: &str| {
            fields
                .get(key)
                .copied()
                .ok_or_else(|| malformed(&format!("missing field '{key}'")))
        };

        let chain_id = field("Chain ID")?
            .parse()
            .map_err(|_| malformed("bad chain id"))?;
        let issued_at =
            parse_timestamp(field("Issued At")?).ok_or_else(|| malformed("bad issued-at"))?;
        let expiration_time = match fields.get("Expiration Time") {
            Some(value) => {
                Some(parse_timestamp(value).ok_or_else(|| malformed("bad expiration time"))?)
            }
            None => None,
        };

        Ok(Self {
            domain: domain.to_string(),
            address: address.to_string(),
            statement: statement.to_string(),
            uri: field("URI")?.to_string(),
            version: field("Version")?.to_string(),
            chain_id,
            nonce: field("Nonce")?.to_string(),
            issued_at,
            expiration_time,
        })
    }
}

/// Server-issued nonce, MAC'd so the relay can stay stateless about issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceToken {
    pub nonce: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub mac: String,
}

/// Issues and checks nonce tokens
#[derive(Clone)]
pub struct NonceIssuer {
    secret: [u8; 32],
    ttl_secs: u64,
}

impl fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer {
    #[must_use]
    pub const fn new(secret: [u8; 32], ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }

    #[must_use]
    pub fn issue(&self, now: u64) -> NonceToken {
        let nonce = hex::encode(rand::random::<[u8; 16]>());
        let expires_at = now.saturating_add(self.ttl_secs);
        let mac = self.mac(&nonce, now, expires_at);
        NonceToken {
            nonce,
            issued_at: now,
            expires_at,
            mac,
        }
    }

    /// # Errors
    /// `BadToken` if the MAC does not verify, `TokenExpired` past expiry.
    pub fn verify(&self, token: &NonceToken, now: u64) -> Result<(), AuthError> {
        if token.mac != self.mac(&token.nonce, token.issued_at, token.expires_at) {
            return Err(AuthError::BadToken);
        }
        if now > token.expires_at {
            return Err(AuthError::TokenExpired);
        }
        Ok(())
    }

    fn mac(&self, nonce: &str, issued_at: u64, expires_at: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret);
        hasher.update(nonce.as_bytes());
        hasher.update(issued_at.to_be_bytes());
        hasher.update(expires_at.to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Hex-encoded signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub String);

/// A wallet that can sign messages
pub trait Signer {
    fn address(&self) -> String;
    fn sign(&self, message: &str) -> Signature;
}

/// Checks that `signature` over `message` was made by `address`
pub trait SignatureVerifier {
    fn verify(&self, message: &str, signature: &Signature, address: &str) -> bool;
}

/// Development wallet with keyed SHA-256 signatures
#[derive(Clone)]
pub struct DevWallet {
    key: [u8; 32],
}

impl fmt::Debug for DevWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevWallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl DevWallet {
    #[must_use]
    pub const fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    fn signature_for(key: &[u8; 32], message: &str) -> Signature {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.update(message.as_bytes());
        Signature(hex::encode(hasher.finalize()))
    }
}

impl Signer for DevWallet {
    fn address(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"address");
        hasher.update(self.key);
        let digest = hex::encode(hasher.finalize());
        format!("0x{}", &digest[..40])
    }

    fn sign(&self, message: &str) -> Signature {
        Self::signature_for(&self.key, message)
    }
}

/// Verifier for [`DevWallet`] signatures
#[derive(Default, Clone)]
pub struct DevKeyring {
    keys: FxHashMap<String, [u8; 32]>,
}

impl DevKeyring {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, wallet: &DevWallet) {
        self.keys.insert(wallet.address(), wallet.key);
    }
}

impl SignatureVerifier for DevKeyring {
    fn verify(&self, message: &str, signature: &Signature, address: &str) -> bool {
        self.keys
            .get(address)
            .is_some_and(|key| DevWallet::signature_for(key, message) == *signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(exp: Option<u64>) -> SignInMessage {
        SignInMessage {
            domain: "wordle.example".to_string(),
            address: "0x0123456789abcdef0123456789abcdef01234567".to_string(),
            statement: "Submit my Wordle score".to_string(),
            uri: "https://wordle.example".to_string(),
            version: "1".to_string(),
            chain_id: 137,
            nonce: "deadbeef".to_string(),
            issued_at: 1_650_000_000,
            expiration_time: exp,
        }
    }

    #[test]
    fn timestamps_round_trip() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp(1_624_060_800), "2021-06-19T00:00:00Z");
        for secs in [0, 59, 86_399, 1_650_000_000] {
            assert_eq!(parse_timestamp(&format_timestamp(secs)), Some(secs));
        }
        assert_eq!(parse_timestamp("2021-06-19T24:00:00Z"), None);
        assert_eq!(parse_timestamp("2021-06-19T00:00:00"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn timestamps_accept_other_rfc3339_forms() {
        // Millisecond form produced by JavaScript's toISOString
        assert_eq!(parse_timestamp("2021-06-19T00:00:00.000Z"), Some(1_624_060_800));
        assert_eq!(parse_timestamp("2021-06-19T00:00:00+00:00"), Some(1_624_060_800));
        assert_eq!(parse_timestamp("2021-06-19T02:00:00+02:00"), Some(1_624_060_800));
        assert_eq!(parse_timestamp("1969-12-31T23:59:59Z"), None);
    }

    #[test]
    fn message_with_fractional_issued_at_parses() {
        let text = message(None)
            .to_text()
            .replace("Issued At: 2022-04-15T05:20:00Z", "Issued At: 2022-04-15T05:20:00.250Z");
        assert!(text.contains(".250Z"));
        assert_eq!(SignInMessage::parse(&text).unwrap().issued_at, 1_650_000_000);
    }

    #[test]
    fn message_text_layout() {
        let text = message(None).to_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "wordle.example wants you to sign in with your Ethereum account:"
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Submit my Wordle score");
        assert!(text.contains("\nNonce: deadbeef\n"));
        assert!(!text.contains("Expiration Time"));
    }

    #[test]
    fn message_parse_round_trip() {
        for exp in [None, Some(1_650_000_600)] {
            let original = message(exp);
            assert_eq!(SignInMessage::parse(&original.to_text()).unwrap(), original);
        }
    }

    #[test]
    fn message_parse_rejects_garbage() {
        assert!(matches!(
            SignInMessage::parse("hello"),
            Err(AuthError::MalformedMessage(_))
        ));
        let text = message(None).to_text().replace("Nonce: deadbeef\n", "");
        assert_eq!(
            SignInMessage::parse(&text),
            Err(AuthError::MalformedMessage("missing field 'Nonce'".to_string()))
        );
    }

    #[test]
    fn nonce_token_verifies() {
        let issuer = NonceIssuer::new([1; 32], 300);
        let token = issuer.issue(1000);
        assert_eq!(token.expires_at, 1300);
        assert_eq!(token.nonce.len(), 32);
        assert!(issuer.verify(&token, 1300).is_ok());
        assert_eq!(issuer.verify(&token, 1301), Err(AuthError::TokenExpired));
    }

    #[test]
    fn tampered_token_rejected() {
        let issuer = NonceIssuer::new([1; 32], 300);
        let mut token = issuer.issue(1000);
        token.expires_at += 1000;
        assert_eq!(issuer.verify(&token, 1100), Err(AuthError::BadToken));

        let other = NonceIssuer::new([2; 32], 300);
        assert_eq!(other.verify(&issuer.issue(1000), 1000), Err(AuthError::BadToken));
    }

    #[test]
    fn dev_wallet_signatures() {
        let wallet = DevWallet::new([3; 32]);
        let mut keyring = DevKeyring::new();
        keyring.register(&wallet);

        let address = wallet.address();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);

        let sig = wallet.sign("hello");
        assert!(keyring.verify("hello", &sig, &address));
        assert!(!keyring.verify("hullo", &sig, &address));

        let stranger = DevWallet::new([4; 32]);
        assert!(!keyring.verify("hello", &stranger.sign("hello"), &stranger.address()));
    }
}
