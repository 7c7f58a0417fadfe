//! Frame grammar.
//!
//! ```text
//! SEP escaped_key KEY_SEP key_len SEP value_len SEP escaped_value
//! ```
//!
//! `key_len` is the UTF-8 byte length of the unescaped key and `value_len` the byte length of
//! the escaped value, both in decimal. Escaped text never contains [`SEP`], so a frame starts
//! at every `SEP` that the scanner reaches and ends exactly `value_len` bytes after the third.
//! Anything between frames that holds no `SEP` (baseline markers, for instance) is skipped.

use crate::error::CodecError;
use std::ops::Range;

/// Frame separator.
pub const SEP: char = '\u{1}';

/// Splits an escaped key from its length annotation.
pub const KEY_SEP: char = '.';

/// Reserved for baseline markers; escapers never emit it.
pub const MARK: char = '\u{2}';

/// Serializes one frame from already escaped parts.
#[must_use]
pub fn encode_frame(escaped_key: &str, key_len: usize, escaped_value: &str) -> String {
    let mut frame = needle(escaped_key, key_len);
    frame.push_str(&escaped_value.len().to_string());
    frame.push(SEP);
    frame.push_str(escaped_value);
    frame
}

/// The frame header up to and including the separator before the value length.
///
/// Equal headers identify the same key.
#[must_use]
pub fn needle(escaped_key: &str, key_len: usize) -> String {
    format!("{SEP}{escaped_key}{KEY_SEP}{key_len}{SEP}")
}

/// A frame located in a buffer image, still escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame<'a> {
    pub key: &'a str,
    pub key_len: usize,
    pub value: &'a str,
    /// Byte range of the whole frame within the image.
    pub span: Range<usize>,
    /// Same text as [`needle`] would produce for this frame.
    pub head: &'a str,
}

/// Left-to-right scanner over the frames of a buffer image.
///
/// Yields an error once and then stops if the image breaks the grammar.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    image: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Frames<'a> {
    /// Starts scanning `image` at byte offset `from`.
    #[must_use]
    pub const fn new(image: &'a str, from: usize) -> Self {
        Self { image, pos: from, done: false }
    }

    fn malformed(&mut self, at: usize, what: &str) -> CodecError {
        self.done = true;
        CodecError::Malformed {
            message: format!("{what} in frame at byte {at}").into(),
            context: Some("frame scan".into()),
        }
    }

    fn find_sep(&self, from: usize) -> Option<usize> {
        self.image.get(from..)?.find(SEP).map(|i| from + i)
    }

    fn scan(&mut self) -> Option<Result<RawFrame<'a>, CodecError>> {
        let start = self.find_sep(self.pos)?;

        let Some(key_end) = self.find_sep(start + 1) else {
            return Some(Err(self.malformed(start, "unterminated key")));
        };
        let header = &self.image[start + 1..key_end];
        let Some(dot) = header.rfind(KEY_SEP) else {
            return Some(Err(self.malformed(start, "missing key length")));
        };
        let Some(key_len) = parse_len(&header[dot + 1..]) else {
            return Some(Err(self.malformed(start, "invalid key length")));
        };

        let Some(len_end) = self.find_sep(key_end + 1) else {
            return Some(Err(self.malformed(start, "unterminated value length")));
        };
        let Some(value_len) = parse_len(&self.image[key_end + 1..len_end]) else {
            return Some(Err(self.malformed(start, "invalid value length")));
        };

        let value_start = len_end + 1;
        let end = value_start.saturating_add(value_len);
        let Some(value) = self.image.get(value_start..end) else {
            return Some(Err(self.malformed(start, "truncated value")));
        };
        if value.contains(SEP) {
            return Some(Err(self.malformed(start, "separator inside value")));
        }

        self.pos = end;
        Some(Ok(RawFrame {
            key: &header[..dot],
            key_len,
            value,
            span: start..end,
            head: &self.image[start..=key_end],
        }))
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<RawFrame<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.scan();
        if item.is_none() {
            self.done = true;
        }
        item
    }
}

fn parse_len(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
