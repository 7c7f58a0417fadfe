//! RC4 key scheduling and keystream generation.
//!
//! The key schedule is run once in [`Rc4::new`] and the resulting permutation is cloned for
//! every message, so each call starts at keystream position zero. That restart is what makes
//! [`Rc4::transform`] its own inverse and makes equal plaintexts encode to equal ciphertexts.

use crate::error::CipherError;
use crate::latin1;
use zeroize::{Zeroize, ZeroizeOnDrop};

const STATE_LEN: usize = 256;

/// An RC4 cipher bound to one key.
///
/// Keystream generation advances `i` from position zero (`i = k mod 256` for the `k`-th
/// byte) before the swap, matching the scrambler whose buffers this crate reads.
///
/// # Example
///
/// ```rust
/// use lss_cipher::Rc4;
///
/// # fn main() -> Result<(), lss_cipher::CipherError> {
/// let cipher = Rc4::new(b"K")?;
/// let encoded = cipher.transform(b"AB");
/// assert_eq!(encoded, [0x55, 0xef]);
/// assert_eq!(cipher.transform(&encoded), b"AB");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Rc4 {
    schedule: [u8; STATE_LEN],
}

impl std::fmt::Debug for Rc4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rc4").field("schedule", &"<redacted>").finish()
    }
}

impl Rc4 {
    /// Runs the key schedule for `key`.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidArgument`] if `key` is empty.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, CipherError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(CipherError::InvalidArgument {
                message: "cipher key must not be empty".into(),
                context: Some("key schedule".into()),
            });
        }

        let mut schedule = [0u8; STATE_LEN];
        for (slot, value) in schedule.iter_mut().zip(0u8..=u8::MAX) {
            *slot = value;
        }

        let mut j = 0u8;
        for i in 0..STATE_LEN {
            j = j.wrapping_add(schedule[i]).wrapping_add(key[i % key.len()]);
            schedule.swap(i, usize::from(j));
        }

        Ok(Self { schedule })
    }

    /// Encodes or decodes `data`; the two directions are the same operation.
    #[must_use]
    pub fn transform(&self, data: impl AsRef<[u8]>) -> Vec<u8> {
        let mut out = data.as_ref().to_vec();
        self.apply(&mut out);
        out
    }

    /// Transforms `buf` in place.
    pub fn apply(&self, buf: &mut [u8]) {
        let mut state = self.schedule;
        let mut j = 0u8;

        for (k, byte) in buf.iter_mut().enumerate() {
            let i = k % STATE_LEN;
            let held = state[i];
            j = j.wrapping_add(held);
            state[i] = state[usize::from(j)];
            state[usize::from(j)] = held;
            *byte ^= state[usize::from(state[i].wrapping_add(held))];
        }

        state.zeroize();
    }

    /// Transforms a byte string, one character per byte.
    ///
    /// The result is again a byte string (every char at or below U+00FF) of the same length
    /// in characters.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidInput`] if `data` contains a character above U+00FF.
    pub fn transform_str(&self, data: &str) -> Result<String, CipherError> {
        let mut bytes = latin1::decode(data)?;
        self.apply(&mut bytes);
        Ok(latin1::encode(&bytes))
    }
}

/// One-shot form of [`Rc4::transform`].
///
/// # Errors
/// Returns [`CipherError::InvalidArgument`] if `key` is empty.
pub fn transform(
    key: impl AsRef<[u8]>,
    data: impl AsRef<[u8]>,
) -> Result<Vec<u8>, CipherError> {
    Ok(Rc4::new(key)?.transform(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(transform(b"K", b"AB").unwrap(), [0x55, 0xef]);
        assert_eq!(
            transform(b"Key", b"Plaintext").unwrap(),
            [0x59, 0xcd, 0x2b, 0xf5, 0x57, 0x20, 0xce, 0x47, 0xd6]
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = Rc4::new(b"");
        assert!(matches!(result, Err(CipherError::InvalidArgument { .. })));
    }

    #[test]
    fn test_empty_data_passes_through() {
        let cipher = Rc4::new(b"key").unwrap();
        assert!(cipher.transform(b"").is_empty());
    }

    #[test]
    fn test_keystream_restarts_per_message() {
        let cipher = Rc4::new(b"secret").unwrap();
        assert_eq!(cipher.transform(b"same"), cipher.transform(b"same"));
    }

    #[test]
    fn test_long_input_wraps_index() {
        let cipher = Rc4::new(b"wrap").unwrap();
        let data: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();

        let encoded = cipher.transform(&data);
        assert_eq!(encoded.len(), data.len());
        assert_eq!(cipher.transform(&encoded), data);
    }

    #[test]
    fn test_transform_str_rejects_wide_chars() {
        let cipher = Rc4::new(b"key").unwrap();
        let result = cipher.transform_str("snowman \u{2603}");
        assert!(matches!(result, Err(CipherError::InvalidInput { .. })));
    }

    #[test]
    fn test_debug_is_redacted() {
        let cipher = Rc4::new(b"key").unwrap();
        assert!(format!("{cipher:?}").contains("redacted"));
    }
}
