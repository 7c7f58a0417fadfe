//! The [`Lss`] handle: get/set/del/enumerate over one backing buffer.

use crate::buffer::{BackingBuffer, MemoryBuffer};
use crate::builder::{LssBuilder, NoBuffer};
use crate::error::CodecError;
use crate::escape::Escaper;
use crate::frame::{self, Frames, RawFrame};
use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Linear String Storage over a [`BackingBuffer`].
///
/// Every key occurs in at most one frame. `set` removes the old frame and appends the new one
/// in a single buffer write, so enumeration order is the order in which keys were last set.
///
/// Frames are looked up from the end of the `baseline`, a prefix that [`Lss::clear`] restores.
/// The handle never writes the baseline on its own; it only reads past it.
///
/// # Example
///
/// ```rust
/// use lss_codec::{Lss, MemoryBuffer};
///
/// # fn main() -> Result<(), lss_codec::CodecError> {
/// let mut lss = Lss::builder().buffer(MemoryBuffer::new()).build();
///
/// lss.set("a", "1")?;
/// lss.set("b", "2")?;
/// lss.set("a", "3")?;
///
/// assert_eq!(lss.get("a")?.as_deref(), Some("3"));
/// assert_eq!(lss.keys()?, ["b", "a"]);
///
/// lss.clear()?;
/// assert!(lss.keys()?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Lss<B: BackingBuffer = MemoryBuffer> {
    pub(crate) buffer: B,
    pub(crate) baseline: String,
    pub(crate) escaper: Arc<dyn Escaper>,
}

impl Lss<MemoryBuffer> {
    #[must_use = "The codec is not usable until you call .buffer(..).build()"]
    pub fn builder() -> LssBuilder<NoBuffer> {
        LssBuilder::new()
    }
}

impl<B: BackingBuffer> Lss<B> {
    /// Returns the value stored under `key`, or `None` when there is no frame for it.
    ///
    /// An empty value is a hit: `Some("")`.
    ///
    /// # Errors
    /// Returns [`CodecError::Malformed`] if the buffer cannot be parsed up to the frame, or its
    /// value cannot be unescaped.
    pub fn get(&self, key: &str) -> Result<Option<String>, CodecError> {
        let image = self.buffer.read();
        match self.locate(&image, key)? {
            Some(found) => Ok(Some(self.escaper.unescape(found.value)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    /// See [`Lss::get`].
    pub fn contains(&self, key: &str) -> Result<bool, CodecError> {
        let image = self.buffer.read();
        Ok(self.locate(&image, key)?.is_some())
    }

    /// Stores `value` under `key`, replacing any previous frame for it.
    ///
    /// # Errors
    /// * [`CodecError::Malformed`] if the current buffer cannot be parsed.
    /// * [`CodecError::StorageFull`] if the buffer did not keep the new image. The previous
    ///   image is written back before returning.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let prior = self.buffer.read();
        let mut image = prior.clone();

        if let Some(span) = self.locate(&prior, key)?.map(|f| f.span) {
            image.replace_range(span, "");
        }
        image.push_str(&self.encode(key, value));

        self.commit(&prior, &image, "set")
    }

    /// Removes the frame for `key`. Returns whether one was present.
    ///
    /// Removing an absent key leaves the buffer untouched.
    ///
    /// # Errors
    /// See [`Lss::set`].
    pub fn del(&mut self, key: &str) -> Result<bool, CodecError> {
        let prior = self.buffer.read();
        let Some(span) = self.locate(&prior, key)?.map(|f| f.span) else {
            return Ok(false);
        };

        let mut image = prior.clone();
        image.replace_range(span, "");
        self.commit(&prior, &image, "del")?;
        Ok(true)
    }

    /// Removes every frame whose key fails `keep`, in one write. Returns how many went.
    ///
    /// # Errors
    /// See [`Lss::set`].
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> Result<usize, CodecError> {
        let prior = self.buffer.read();
        let mut image = String::with_capacity(prior.len());
        let mut copied = 0;
        let mut removed = 0;

        for raw in self.frames(&prior) {
            let raw = raw?;
            if keep(&self.escaper.unescape(raw.key)?) {
                continue;
            }
            image.push_str(&prior[copied..raw.span.start]);
            copied = raw.span.end;
            removed += 1;
        }

        if removed == 0 {
            return Ok(0);
        }
        image.push_str(&prior[copied..]);
        self.commit(&prior, &image, "retain")?;
        Ok(removed)
    }

    /// Lists the keys in buffer order.
    ///
    /// The scan reads one snapshot of the buffer; rerun it after mutating.
    ///
    /// # Errors
    /// Returns [`CodecError::Malformed`] if the buffer cannot be parsed.
    pub fn keys(&self) -> Result<Vec<String>, CodecError> {
        let image = self.buffer.read();
        self.frames(&image).map(|raw| self.escaper.unescape(raw?.key)).collect()
    }

    /// Lists key/value pairs in buffer order.
    ///
    /// # Errors
    /// See [`Lss::keys`].
    pub fn entries(&self) -> Result<Vec<(String, String)>, CodecError> {
        let image = self.buffer.read();
        self.frames(&image)
            .map(|raw| -> Result<(String, String), CodecError> {
                let raw = raw?;
                Ok((self.escaper.unescape(raw.key)?, self.escaper.unescape(raw.value)?))
            })
            .collect()
    }

    /// Rewrites the buffer as the baseline followed by `entries`, in one write.
    ///
    /// A key listed more than once keeps the value and position of its last occurrence.
    ///
    /// # Errors
    /// Returns [`CodecError::StorageFull`] if the buffer did not keep the new image. The
    /// previous image is written back before returning.
    pub fn rebuild<'e>(
        &mut self,
        entries: impl IntoIterator<Item = (&'e str, &'e str)>,
    ) -> Result<(), CodecError> {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut seen = FxHashSet::default();
        let frames: Vec<String> = entries
            .iter()
            .rev()
            .filter(|(key, _)| seen.insert(*key))
            .map(|(key, value)| self.encode(key, value))
            .collect();

        let mut image = self.baseline.clone();
        for frame in frames.iter().rev() {
            image.push_str(frame);
        }

        let prior = self.buffer.read();
        self.commit(&prior, &image, "rebuild")
    }

    /// Resets the buffer to the baseline.
    ///
    /// # Errors
    /// Returns [`CodecError::StorageFull`] if the buffer cannot hold the baseline.
    pub fn clear(&mut self) -> Result<(), CodecError> {
        let prior = self.buffer.read();
        let baseline = self.baseline.clone();
        self.commit(&prior, &baseline, "clear")
    }

    #[must_use]
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    #[must_use]
    pub fn escaper(&self) -> &Arc<dyn Escaper> {
        &self.escaper
    }

    #[must_use]
    pub const fn buffer(&self) -> &B {
        &self.buffer
    }

    #[must_use]
    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Current buffer contents.
    #[must_use]
    pub fn image(&self) -> String {
        self.buffer.read()
    }

    fn encode(&self, key: &str, value: &str) -> String {
        frame::encode_frame(&self.escaper.escape(key), key.len(), &self.escaper.escape(value))
    }

    /// Where lookups start: past the baseline when the buffer still begins with it.
    fn offset(&self, image: &str) -> usize {
        if image.starts_with(&self.baseline) { self.baseline.len() } else { 0 }
    }

    fn frames<'a>(&self, image: &'a str) -> Frames<'a> {
        Frames::new(image, self.offset(image))
    }

    fn locate<'a>(&self, image: &'a str, key: &str) -> Result<Option<RawFrame<'a>>, CodecError> {
        let needle = frame::needle(&self.escaper.escape(key), key.len());
        for raw in self.frames(image) {
            let raw = raw?;
            if raw.head == needle {
                return Ok(Some(raw));
            }
        }
        Ok(None)
    }

    fn commit(&mut self, prior: &str, image: &str, op: &'static str) -> Result<(), CodecError> {
        self.buffer.write(image);

        let kept = self.buffer.read();
        if kept == image {
            debug!(op, bytes = image.len(), "Buffer rewritten");
            return Ok(());
        }

        warn!(op, expected = image.len(), kept = kept.len(), "Buffer rejected write; restoring");
        self.buffer.write(prior);

        Err(CodecError::StorageFull {
            message: format!("buffer kept {} of {} bytes", kept.len(), image.len()).into(),
            context: Some(op.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PercentEscaper;

    fn lss() -> Lss<MemoryBuffer> {
        Lss::builder().buffer(MemoryBuffer::new()).build()
    }

    #[test]
    fn test_get_absent_is_none() {
        assert_eq!(lss().get("missing").unwrap(), None);
    }

    #[test]
    fn test_empty_value_is_a_hit() {
        let mut lss = lss();
        lss.set("k", "").unwrap();

        assert_eq!(lss.get("k").unwrap().as_deref(), Some(""));
        assert!(lss.contains("k").unwrap());
    }

    #[test]
    fn test_set_replaces_and_moves_to_end() {
        let mut lss = lss();
        lss.set("a", "1").unwrap();
        lss.set("b", "2").unwrap();
        lss.set("a", "3").unwrap();

        assert_eq!(lss.keys().unwrap(), ["b", "a"]);
        assert_eq!(lss.get("a").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_prefix_keys_do_not_collide() {
        let mut lss = lss();
        lss.set("ab", "long").unwrap();
        lss.set("a", "short").unwrap();

        assert_eq!(lss.get("a").unwrap().as_deref(), Some("short"));
        assert_eq!(lss.get("ab").unwrap().as_deref(), Some("long"));
    }

    #[test]
    fn test_separator_in_data_roundtrips() {
        let mut lss = lss();
        lss.set("\u{1}k", "v\u{1}\u{2}").unwrap();

        assert_eq!(lss.get("\u{1}k").unwrap().as_deref(), Some("v\u{1}\u{2}"));
        assert_eq!(lss.image().matches(frame::SEP).count(), 3);
    }

    #[test]
    fn test_del_is_idempotent() {
        let mut lss = lss();
        lss.set("a", "1").unwrap();
        lss.set("b", "2").unwrap();

        assert!(lss.del("a").unwrap());
        let after_first = lss.image();
        assert!(!lss.del("a").unwrap());
        assert_eq!(lss.image(), after_first);
    }

    #[test]
    fn test_clear_restores_baseline() {
        let buffer = MemoryBuffer::from_image("HEAD");
        let mut lss = Lss::builder().baseline("HEAD").buffer(buffer).build();

        lss.set("k", "v").unwrap();
        assert!(lss.image().starts_with("HEAD"));

        lss.clear().unwrap();
        assert_eq!(lss.image(), "HEAD");
    }

    #[test]
    fn test_frames_inside_baseline_are_invisible() {
        let seeded = frame::encode_frame("old", 3, "x");
        let buffer = MemoryBuffer::from_image(seeded.clone());
        let lss = Lss::builder().baseline(seeded).buffer(buffer).build();

        assert_eq!(lss.get("old").unwrap(), None);
        assert!(lss.keys().unwrap().is_empty());
    }

    #[test]
    fn test_retain_removes_in_one_pass() {
        let mut lss = lss();
        for key in ["x1", "y1", "x2", "y2"] {
            lss.set(key, key).unwrap();
        }

        let removed = lss.retain(|k| !k.starts_with('x')).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(lss.keys().unwrap(), ["y1", "y2"]);
        assert_eq!(lss.retain(|_| true).unwrap(), 0);
    }

    #[test]
    fn test_rebuild_writes_baseline_and_entries_once() {
        let buffer = MemoryBuffer::from_image("HEAD\u{1}junk");
        let mut lss = Lss::builder().baseline("HEAD").buffer(buffer).build();

        lss.rebuild([("a", "1"), ("b", "2"), ("a", "3")]).unwrap();

        assert!(lss.image().starts_with("HEAD\u{1}"));
        assert!(!lss.image().contains("junk"));
        assert_eq!(lss.keys().unwrap(), ["b", "a"]);
        assert_eq!(lss.get("a").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_rebuild_that_does_not_fit_keeps_prior_image() {
        let mut lss = Lss::builder().buffer(MemoryBuffer::with_limit(32)).build();
        lss.set("a", "1").unwrap();
        let before = lss.image();

        let long = "x".repeat(64);
        let err = lss.rebuild([("a", "1"), ("b", long.as_str())]).unwrap_err();

        assert!(matches!(err, CodecError::StorageFull { .. }));
        assert_eq!(lss.image(), before);
    }

    #[test]
    fn test_full_buffer_keeps_prior_image() {
        let buffer = MemoryBuffer::with_limit(24);
        let mut lss = Lss::builder().buffer(buffer).build();

        lss.set("a", "1").unwrap();
        let before = lss.image();

        let err = lss.set("b", &"x".repeat(64)).unwrap_err();
        assert!(matches!(err, CodecError::StorageFull { .. }));
        assert_eq!(lss.image(), before);
        assert_eq!(lss.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_entries_are_unescaped() {
        let mut lss = Lss::builder().escaper(PercentEscaper).buffer(MemoryBuffer::new()).build();
        lss.set("k y", "v.1").unwrap();

        assert_eq!(lss.entries().unwrap(), [("k y".to_owned(), "v.1".to_owned())]);
    }

    #[test]
    fn test_malformed_buffer_is_reported() {
        let buffer = MemoryBuffer::from_image("\u{1}broken");
        let lss = Lss::builder().buffer(buffer).build();

        assert!(matches!(lss.keys(), Err(CodecError::Malformed { .. })));
        assert!(matches!(lss.get("x"), Err(CodecError::Malformed { .. })));
    }
}
