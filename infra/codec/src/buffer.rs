//! Host string slots the codec reads and rewrites.

use parking_lot::RwLock;
use std::sync::Arc;

/// A mutable string slot owned by the host.
///
/// The codec only ever replaces the whole image. Implementations must hand back exactly what
/// was written, or something shorter when the slot is full; the codec notices the mismatch on
/// read-back.
pub trait BackingBuffer {
    fn read(&self) -> String;

    fn write(&mut self, image: &str);
}

impl BackingBuffer for String {
    fn read(&self) -> String {
        self.clone()
    }

    fn write(&mut self, image: &str) {
        image.clone_into(self);
    }
}

/// An in-memory slot shared by every clone.
///
/// Clones observe each other's writes, which is how several stores (or a store and a test)
/// share one buffer. An optional limit in bytes models a host slot with finite capacity:
/// writes beyond it are cut at the last char boundary that fits, silently.
///
/// # Example
///
/// ```rust
/// use lss_codec::{BackingBuffer, MemoryBuffer};
///
/// let mut slot = MemoryBuffer::with_limit(4);
/// let observer = slot.clone();
///
/// slot.write("abcdef");
/// assert_eq!(observer.read(), "abcd");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    slot: Arc<RwLock<String>>,
    limit: Option<usize>,
}

impl MemoryBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { slot: Arc::default(), limit: Some(limit) }
    }

    /// A slot that already holds `image`, as a host slot surviving a reload would.
    #[must_use]
    pub fn from_image(image: impl Into<String>) -> Self {
        Self { slot: Arc::new(RwLock::new(image.into())), limit: None }
    }

    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slot.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.read().is_empty()
    }
}

impl BackingBuffer for MemoryBuffer {
    fn read(&self) -> String {
        self.slot.read().clone()
    }

    fn write(&mut self, image: &str) {
        let kept = match self.limit {
            Some(limit) if image.len() > limit => {
                let mut end = limit;
                while !image.is_char_boundary(end) {
                    end -= 1;
                }
                &image[..end]
            },
            _ => image,
        };

        let mut slot = self.slot.write();
        slot.clear();
        slot.push_str(kept);
    }
}
