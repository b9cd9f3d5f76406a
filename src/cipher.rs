//! At-rest protection for CNIC values. The stored column holds a Fernet
//! token; a SHA-256 digest of the normalized plaintext rides alongside it as
//! the deterministic uniqueness key (tokens are salted per encryption, so
//! they cannot carry the UNIQUE constraint themselves).
//!
//! Without a key the cipher degrades to plaintext storage with a warning, a
//! deliberate safety relaxation for non-production environments.

use fernet::Fernet;
use sha2::{Digest, Sha256};
use tracing::warn;

pub struct CnicCipher {
    inner: Option<Fernet>,
}

impl CnicCipher {
    /// Build from a url-safe base64 Fernet key. `None` selects plaintext
    /// mode; an unparseable key is a hard startup error.
    pub fn from_key(key: Option<&str>) -> anyhow::Result<Self> {
        match key {
            Some(k) => {
                let fernet = Fernet::new(k).ok_or_else(|| {
                    anyhow::anyhow!("invalid CNIC key (expected 32-byte url-safe base64)")
                })?;
                Ok(Self {
                    inner: Some(fernet),
                })
            }
            None => {
                warn!("CNIC key not set; CNIC values will be stored as plaintext");
                Ok(Self { inner: None })
            }
        }
    }

    pub fn plaintext_mode(&self) -> bool {
        self.inner.is_none()
    }

    /// Plaintext CNIC -> stored representation.
    pub fn protect(&self, cnic: &str) -> String {
        match &self.inner {
            Some(f) => f.encrypt(cnic.as_bytes()),
            None => cnic.to_string(),
        }
    }

    /// Stored representation -> plaintext. Rows written in plaintext mode
    /// fail token decryption and read back as-is.
    pub fn reveal(&self, stored: &str) -> String {
        match &self.inner {
            Some(f) => f
                .decrypt(stored)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| stored.to_string()),
            None => stored.to_string(),
        }
    }

    /// Deterministic uniqueness key for a normalized plaintext CNIC. Key
    /// material does not participate, so dedup behaves identically in
    /// encrypted and plaintext modes.
    pub fn digest(cnic: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(cnic.as_bytes());
        hex::encode(hasher.finalize())
    }
}
