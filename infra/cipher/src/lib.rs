//! A small, self-inverse stream cipher for scrambling stored strings.
//!
//! This crate keeps values in a shared string slot unintelligible to casual inspection. It is
//! **not** a confidentiality boundary: RC4 is broken as a cryptographic primitive, the keystream
//! restarts for every message and nothing authenticates the ciphertext. Treat it as a
//! scrambling layer only.
//!
//! ## Model
//!
//! * [`Rc4`] binds a key and transforms byte slices. Encoding and decoding are the same
//!   operation, and output length always equals input length.
//! * [`SessionKey`] owns the key bytes for one session, is zeroized on drop and knows how to
//!   travel over a text-only key channel (lowercase hex).
//! * [`latin1`] bridges bytes and "byte strings": every byte maps to the `char` with the same
//!   code point, so ciphertext can live inside a `String`. Characters above U+00FF are
//!   rejected with [`CipherError::InvalidInput`].
//!
//! ## Example
//!
//! ```rust
//! use lss_cipher::prelude::*;
//!
//! # fn main() -> Result<(), CipherError> {
//! let key = SessionKey::generate(DEFAULT_KEY_LENGTH)?;
//! let cipher = Rc4::new(&key)?;
//!
//! let scrambled = cipher.transform_str("Ann")?;
//! assert_eq!(scrambled.chars().count(), 3);
//! assert_eq!(cipher.transform_str(&scrambled)?, "Ann");
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod key;
pub mod latin1;

pub use engine::{Rc4, transform};
pub use error::{CipherError, CipherErrorExt};
pub use key::{DEFAULT_KEY_LENGTH, SessionKey, generate_key};

pub mod prelude {
    pub use crate::engine::Rc4;
    pub use crate::error::{CipherError, CipherErrorExt};
    pub use crate::key::{DEFAULT_KEY_LENGTH, SessionKey};
}
