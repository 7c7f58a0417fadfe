//! The key channel: a small session-scoped slot that carries the cipher key between attaches.

use parking_lot::RwLock;
use std::sync::Arc;

/// Host slot holding the session key in text form.
///
/// It must hand back, within the same session, exactly what this process wrote. A channel
/// that drops the write makes the store unusable.
pub trait KeyChannel {
    fn read(&self) -> Option<String>;

    fn write(&mut self, value: &str);
}

/// In-memory key channel shared by every clone.
///
/// [`MemoryChannel::rejecting`] builds one that ignores writes, like a host that refuses to
/// set the carrier (cookies disabled, for instance).
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    slot: Arc<RwLock<Option<String>>>,
    rejecting: bool,
}

impl MemoryChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rejecting() -> Self {
        Self { slot: Arc::default(), rejecting: true }
    }

    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self { slot: Arc::new(RwLock::new(Some(value.into()))), rejecting: false }
    }

    /// Forgets the key, as the host does when the session ends.
    pub fn end_session(&self) {
        self.slot.write().take();
    }
}

impl KeyChannel for MemoryChannel {
    fn read(&self) -> Option<String> {
        self.slot.read().clone()
    }

    fn write(&mut self, value: &str) {
        if !self.rejecting {
            *self.slot.write() = Some(value.to_owned());
        }
    }
}
