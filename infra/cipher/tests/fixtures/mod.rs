use lss_cipher::prelude::*;

/// Builds a cipher from a fixed key so expectations stay deterministic.
/// # Panics
/// * If the fixed key is rejected, the function will panic.
#[must_use]
pub fn fixed_cipher() -> Rc4 {
    Rc4::new(b"fixture-session-key").expect("Fixture key rejected")
}
