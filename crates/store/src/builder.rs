use crate::bootstrap;
use crate::channel::KeyChannel;
use crate::config::{Sharing, StoreConfig};
use crate::engine::SessionStore;
use crate::error::StoreError;
use lss_codec::{BackingBuffer, Escaper, PercentEscaper};
use private::Sealed;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct StoreOptions {
    config: StoreConfig,
    escaper: Arc<dyn Escaper>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { config: StoreConfig::default(), escaper: Arc::new(PercentEscaper) }
    }
}

#[derive(Debug, Default)]
pub struct NoBacking;
#[derive(Debug)]
pub struct WithBacking<B, C> {
    buffer: B,
    channel: C,
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoBacking {}
impl<B: BackingBuffer, C: KeyChannel> Sealed for WithBacking<B, C> {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StoreBuilder<S: Sealed = NoBacking> {
    state: S,
    options: StoreOptions,
}

#[allow(private_bounds)]
impl<S: Sealed> StoreBuilder<S> {
    #[must_use = "Replaces the whole store configuration"]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.options.config = config;
        self
    }

    #[must_use = "Sets the length of generated session keys"]
    pub const fn key_length(mut self, length: usize) -> Self {
        self.options.config.key_length = length;
        self
    }

    #[must_use = "Sets how entries of other domains are treated"]
    pub const fn sharing(mut self, sharing: Sharing) -> Self {
        self.options.config.sharing = sharing;
        self
    }

    /// Escaping strategy for framed keys and values. Every store sharing a buffer must use
    /// the same one.
    #[must_use = "Sets the escaping strategy"]
    pub fn escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.options.escaper = Arc::new(escaper);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> StoreBuilder<N> {
        StoreBuilder { state, options: self.options }
    }
}

impl StoreBuilder<NoBacking> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the host slots holding the entries and the session key"]
    pub fn backing<B, C>(self, buffer: B, channel: C) -> StoreBuilder<WithBacking<B, C>>
    where
        B: BackingBuffer,
        C: KeyChannel,
    {
        self.transition(WithBacking { buffer, channel })
    }
}

impl<B: BackingBuffer, C: KeyChannel> StoreBuilder<WithBacking<B, C>> {
    /// Attaches a store for `domain` to the backing slots.
    ///
    /// Boot sequence:
    /// 1. **Key**: reuse the key found on the channel, or generate one and write it there.
    ///    A channel that does not give the new key back yields an unusable store (not an
    ///    error); check [`SessionStore::is_available`].
    /// 2. **Shape**: a buffer already laid out for this domain is adopted as is.
    /// 3. **Compaction**: otherwise this domain's entries are rewritten behind a fresh
    ///    baseline in one write. Other domains' entries and any text that does not parse as
    ///    frames survive only in [`Sharing::Shared`] mode.
    ///
    /// # Errors
    /// * [`StoreError::InvalidArgument`] if the configuration is invalid.
    /// * [`StoreError::Cipher`] if no key could be generated.
    /// * [`StoreError::Codec`] if the buffer does not keep the rewritten image. The buffer is
    ///   then left as it was.
    /// * [`StoreError::Corrupted`] if one of this domain's entries does not decrypt.
    pub fn attach(self, domain: &str) -> Result<SessionStore<B>, StoreError> {
        let WithBacking { buffer, channel } = self.state;
        bootstrap::attach(buffer, channel, domain, &self.options.config, self.options.escaper)
    }
}
