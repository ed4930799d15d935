//! Content fingerprint of a compiled definition set.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::error::DefError;

/// SHA-256 over the canonical JSON rendering of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, DefError> {
        let mut hasher = Sha256::new();
        serde_json::to_writer(&mut hasher, value)?;
        let digest = hasher.finalize();
        let mut array = [0u8; 32];
        array.copy_from_slice(&digest);
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_as_lower_hex() {
        let fingerprint = Fingerprint::of(&json!({"a": 1})).expect("hash");
        let text = fingerprint.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn equal_values_hash_equally() {
        let a = Fingerprint::of(&json!({"x": [1, 2], "y": "z"})).expect("hash");
        let b = Fingerprint::of(&json!({"x": [1, 2], "y": "z"})).expect("hash");
        let c = Fingerprint::of(&json!({"x": [2, 1], "y": "z"})).expect("hash");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
