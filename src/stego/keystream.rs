//! Rotating XOR keystream.
//!
//! The key is cycled one byte per payload byte. This is light obfuscation,
//! not encryption: the same key applied twice restores the input.

use super::error::StegoError;

/// A non-empty key consumed cyclically, one byte at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystream {
    key: Vec<u8>,
    cursor: usize,
}

impl Keystream {
    /// Creates a keystream from raw key bytes.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, StegoError> {
        let key = key.into();
        if key.is_empty() {
            return Err(StegoError::EmptyKeystream);
        }
        Ok(Self { key, cursor: 0 })
    }

    /// Creates a keystream from the UTF-8 bytes of a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, StegoError> {
        Self::new(passphrase.as_bytes())
    }

    /// Returns the current key byte and rotates to the next one.
    pub fn next_byte(&mut self) -> u8 {
        let byte = self.key[self.cursor];
        self.cursor = (self.cursor + 1) % self.key.len();
        byte
    }

    /// XORs `data` against the stream, advancing it by `data.len()` bytes.
    pub fn apply(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|b| b ^ self.next_byte()).collect()
    }

    /// True when every key byte is zero, so output equals input.
    pub fn is_identity(&self) -> bool {
        self.key.iter().all(|b| *b == 0)
    }
}

impl Default for Keystream {
    fn default() -> Self {
        Self {
            key: vec![0],
            cursor: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let mut ks = Keystream::new(vec![1u8, 2, 3]).unwrap();
        let bytes: Vec<u8> = (0..7).map(|_| ks.next_byte()).collect();
        assert_eq!(bytes, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(Keystream::new(Vec::<u8>::new()), Err(StegoError::EmptyKeystream));
        assert!(Keystream::from_passphrase("").is_err());
    }

    #[test]
    fn test_default_is_identity() {
        let mut ks = Keystream::default();
        assert!(ks.is_identity());
        assert_eq!(ks.apply(b"unchanged"), b"unchanged".to_vec());

        assert!(Keystream::from_passphrase("\0\0").unwrap().is_identity());
        assert!(!Keystream::new(vec![0u8, 1]).unwrap().is_identity());
    }

    #[test]
    fn test_apply_is_self_inverse() {
        let data = b"The quick brown fox";
        let scrambled = Keystream::from_passphrase("key").unwrap().apply(data);
        assert_ne!(scrambled, data.to_vec());
        let restored = Keystream::from_passphrase("key").unwrap().apply(&scrambled);
        assert_eq!(restored, data.to_vec());
    }
}
