//! Escaping strategies for keys and values.

use crate::error::CodecError;
use crate::frame::{MARK, SEP};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;
use std::fmt::Debug;

/// Turns arbitrary text into text that is safe to frame, and back.
///
/// Contract for implementors:
/// * `unescape(&escape(s)) == Ok(s)` for every string `s`.
/// * `escape` never emits [`SEP`] or [`MARK`].
///
/// The frame parser splits a key from its length annotation at the last `.` of the header,
/// so escaping `.` is optional.
pub trait Escaper: Debug + Send + Sync {
    fn escape(&self, raw: &str) -> String;

    /// # Errors
    /// Returns [`CodecError::Malformed`] if `escaped` could not have been produced by
    /// [`Escaper::escape`].
    fn unescape(&self, escaped: &str) -> Result<String, CodecError>;
}

/// Percent-encoding over UTF-8.
///
/// Bytes outside `[A-Za-z0-9_~-]` become `%XX` with uppercase hex digits, so the output is
/// plain ASCII and contains neither control characters nor `.`. On the way back a `%` that is
/// not followed by two hex digits is taken literally.
///
/// ```rust
/// use lss_codec::{Escaper, PercentEscaper};
///
/// let escaped = PercentEscaper.escape("a.b\u{1}é");
/// assert_eq!(escaped, "a%2Eb%01%C3%A9");
/// assert_eq!(PercentEscaper.unescape(&escaped).unwrap(), "a.b\u{1}é");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PercentEscaper;

const RESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'~').remove(b'-');

impl Escaper for PercentEscaper {
    fn escape(&self, raw: &str) -> String {
        utf8_percent_encode(raw, RESERVED).to_string()
    }

    fn unescape(&self, escaped: &str) -> Result<String, CodecError> {
        percent_decode_str(escaped).decode_utf8().map(Cow::into_owned).map_err(|e| {
            CodecError::Malformed {
                message: e.to_string().into(),
                context: Some("percent unescape".into()),
            }
        })
    }
}

/// Checks the separator half of the [`Escaper`] contract for one output.
#[must_use]
pub fn is_frame_safe(escaped: &str) -> bool {
    !escaped.contains([SEP, MARK])
}
