//! # Cipher Errors
//!
//! This module defines the [`CipherError`] enum used for key, input-domain and entropy
//! failures.

use std::borrow::Cow;

/// A specialized [`CipherError`] enum for cipher-related failures.
#[lss_derive::lss_error]
pub enum CipherError {
    /// A caller supplied an argument outside the accepted range (empty key, zero key length).
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Input data lies outside the byte-oriented domain of the cipher.
    ///
    /// Raised for characters above U+00FF and for key text that is not valid hex.
    #[error("Invalid input{}: {message}", format_context(.context))]
    InvalidInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The host random source could not produce key material.
    #[error("Entropy source failure{}: {source}", format_context(.context))]
    Entropy { source: getrandom::Error, context: Option<Cow<'static, str>> },
}
