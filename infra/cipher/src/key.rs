use crate::error::{CipherError, CipherErrorExt};
use getrandom::fill;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Session key length used when the host does not configure one.
pub const DEFAULT_KEY_LENGTH: usize = 128;

/// Key material for one session.
///
/// The bytes never enter the backing buffer; they travel only over the key channel, encoded
/// by [`SessionKey::to_channel`]. Memory is cleared when the key is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}

impl SessionKey {
    /// Draws `length` bytes from the operating system random source.
    ///
    /// Every byte is uniform in `0..=255`. The source is not what makes this crate safe or
    /// unsafe; see the crate docs.
    ///
    /// # Errors
    /// * [`CipherError::InvalidArgument`] if `length` is zero.
    /// * [`CipherError::Entropy`] if the random source fails.
    pub fn generate(length: usize) -> Result<Self, CipherError> {
        if length == 0 {
            return Err(CipherError::InvalidArgument {
                message: "generated key length must be positive".into(),
                context: None,
            });
        }

        let mut bytes = vec![0u8; length];
        fill(&mut bytes).context("session key generation")?;
        Ok(Self { bytes })
    }

    /// Wraps existing key bytes.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, CipherError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CipherError::InvalidArgument {
                message: "session key must not be empty".into(),
                context: None,
            });
        }
        Ok(Self { bytes })
    }

    /// Parses the text form written by [`SessionKey::to_channel`].
    ///
    /// # Errors
    /// * [`CipherError::InvalidInput`] if `text` is not hex.
    /// * [`CipherError::InvalidArgument`] if it decodes to zero bytes.
    pub fn from_channel(text: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(text.trim()).map_err(|e| CipherError::InvalidInput {
            message: e.to_string().into(),
            context: Some("key channel value".into()),
        })?;
        Self::from_bytes(bytes)
    }

    /// Encodes the key for a text-only key channel.
    #[must_use]
    pub fn to_channel(&self) -> String {
        hex::encode(&self.bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl AsRef<[u8]> for SessionKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Shorthand for [`SessionKey::generate`].
///
/// # Errors
/// See [`SessionKey::generate`].
pub fn generate_key(length: usize) -> Result<SessionKey, CipherError> {
    SessionKey::generate(length)
}
