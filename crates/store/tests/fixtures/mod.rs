use lss_codec::frame::Frames;
use lss_codec::prelude::*;
use lss_store::prelude::*;
use lss_store::DomainTag;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

pub const ORIGIN_A: &str = "https://a.example";
pub const ORIGIN_B: &str = "https://b.example";

/// Routes store logs to the test harness. Set `RUST_LOG=lss_store=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One browsing session: a buffer slot and a key channel shared by every store attached to it.
#[derive(Debug, Clone, Default)]
pub struct Host {
    pub buffer: MemoryBuffer,
    pub channel: MemoryChannel,
}

impl Host {
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        Self::default()
    }

    #[must_use]
    pub fn with_buffer(buffer: MemoryBuffer) -> Self {
        init_tracing();
        Self { buffer, channel: MemoryChannel::new() }
    }

    /// # Panics
    /// * If attaching fails.
    #[must_use]
    pub fn attach(&self, domain: &str, sharing: Sharing) -> SessionStore {
        self.try_attach(domain, sharing).expect("Attach failed")
    }

    /// # Errors
    /// Whatever the attach returns.
    pub fn try_attach(&self, domain: &str, sharing: Sharing) -> Result<SessionStore, StoreError> {
        SessionStore::builder()
            .sharing(sharing)
            .key_length(32)
            .backing(self.buffer.clone(), self.channel.clone())
            .attach(domain)
    }

    #[must_use]
    pub fn image(&self) -> String {
        self.buffer.read()
    }
}

/// A buffer that counts writes and, while frozen, drops them like a host slot that is full.
#[derive(Debug, Clone, Default)]
pub struct WatchedBuffer {
    inner: MemoryBuffer,
    writes: Arc<AtomicUsize>,
    frozen: Arc<AtomicBool>,
}

impl WatchedBuffer {
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset_writes(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }

    pub fn freeze(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::SeqCst);
    }
}

impl BackingBuffer for WatchedBuffer {
    fn read(&self) -> String {
        self.inner.read()
    }

    fn write(&mut self, image: &str) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if !self.frozen.load(Ordering::SeqCst) {
            self.inner.write(image);
        }
    }
}

/// Raw text of every frame in `image` that belongs to `tag`, in buffer order.
/// # Panics
/// * If the image does not parse.
#[must_use]
pub fn owned_frames(image: &str, tag: &DomainTag) -> Vec<String> {
    Frames::new(image, 0)
        .map(|f| f.expect("Image does not parse"))
        .filter(|f| tag.owns(&PercentEscaper.unescape(f.key).expect("Key does not unescape")))
        .map(|f| image[f.span].to_owned())
        .collect()
}
