use std::borrow::Cow;

/// A specialized [`CodecError`] enum of this crate.
#[lss_derive::lss_error]
pub enum CodecError {
    /// The backing buffer did not keep what was written to it.
    #[error("Backing buffer full{}: {message}", format_context(.context))]
    StorageFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Buffer contents or escaped text that do not follow the frame grammar.
    #[error("Malformed buffer{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
