use lss_codec::prelude::*;
use lss_codec::{frame, is_frame_safe};

/// A codec over a fresh shared slot, plus a handle to observe that slot.
#[must_use]
pub fn codec() -> (Lss<MemoryBuffer>, MemoryBuffer) {
    let slot = MemoryBuffer::new();
    (Lss::builder().buffer(slot.clone()).build(), slot)
}

/// Escapes only what the frame grammar requires plus `%` itself. Leaves `.` alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalEscaper;

impl Escaper for MinimalEscaper {
    fn escape(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            match ch {
                '%' => out.push_str("%%"),
                frame::SEP => out.push_str("%1"),
                frame::MARK => out.push_str("%2"),
                other => out.push(other),
            }
        }
        debug_assert!(is_frame_safe(&out));
        out
    }

    fn unescape(&self, escaped: &str) -> Result<String, CodecError> {
        let mut out = String::with_capacity(escaped.len());
        let mut chars = escaped.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some('%') => out.push('%'),
                Some('1') => out.push(frame::SEP),
                Some('2') => out.push(frame::MARK),
                _ => {
                    return Err(CodecError::Malformed {
                        message: "dangling escape".into(),
                        context: Some("minimal unescape".into()),
                    });
                },
            }
        }
        Ok(out)
    }
}

/// Counts frames whose decoded key equals `key`, scanning the raw image from the start.
/// # Panics
/// * If the image does not parse.
#[must_use]
pub fn frames_for(image: &str, key: &str, escaper: &dyn Escaper) -> usize {
    frame::Frames::new(image, 0)
        .map(|f| f.expect("Image does not parse"))
        .filter(|f| escaper.unescape(f.key).expect("Key does not unescape") == key)
        .count()
}
