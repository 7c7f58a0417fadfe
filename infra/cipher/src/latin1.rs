//! Byte strings: one `char` per byte.
//!
//! Ciphertext is arbitrary bytes, while the storage layers above speak `String`. A byte
//! string maps byte `b` to the character with code point `b` (ISO-8859-1), which is total in
//! one direction and rejects anything above U+00FF in the other.

use crate::error::CipherError;

/// Renders bytes as a byte string.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Recovers the bytes behind a byte string.
///
/// # Errors
/// Returns [`CipherError::InvalidInput`] naming the first character above U+00FF.
pub fn decode(text: &str) -> Result<Vec<u8>, CipherError> {
    text.chars()
        .enumerate()
        .map(|(position, c)| {
            u8::try_from(c).map_err(|_| CipherError::InvalidInput {
                message: format!("character {c:?} at position {position} exceeds U+00FF").into(),
                context: Some("byte string".into()),
            })
        })
        .collect()
}

/// Returns `true` when every character of `text` fits in one byte.
#[must_use]
pub fn is_byte_string(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_bytes_survive() {
        let bytes: Vec<u8> = (0..=u8::MAX).collect();
        let text = encode(&bytes);

        assert_eq!(text.chars().count(), 256);
        assert!(is_byte_string(&text));
        assert_eq!(decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_wide_char_rejected() {
        let err = decode("ab\u{0100}").unwrap_err();
        assert!(matches!(err, CipherError::InvalidInput { .. }));
        assert!(err.to_string().contains("position 2"));
    }
}
