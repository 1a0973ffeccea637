//! Content fingerprints for exact-duplicate detection

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// SHA-256 digest of the raw upload bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters; this is the stored form
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 || !s.is_ascii() {
            return Err(format!("Invalid fingerprint length: {}", s.len()));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|e| format!("Invalid fingerprint: {}", e))?;
        }
        Ok(Fingerprint(bytes))
    }
}

/// Hash the exact bytes, before any decoding or normalization
pub fn fingerprint(raw: &[u8]) -> Fingerprint {
    let digest = Sha256::digest(raw);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint(bytes)
}

/// Exact-match lookup against already stored fingerprints
pub fn is_duplicate<'a, I>(candidate: &Fingerprint, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Fingerprint>,
{
    existing.into_iter().any(|known| known == candidate)
}
