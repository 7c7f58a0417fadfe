use crate::buffer::BackingBuffer;
use crate::engine::Lss;
use crate::escape::{Escaper, PercentEscaper};
use private::Sealed;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct LssConfig {
    baseline: String,
    escaper: Arc<dyn Escaper>,
}

impl Default for LssConfig {
    fn default() -> Self {
        Self { baseline: String::new(), escaper: Arc::new(PercentEscaper) }
    }
}

#[derive(Debug, Default)]
pub struct NoBuffer;
#[derive(Debug)]
pub struct WithBuffer<B>(B);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoBuffer {}
impl<B: BackingBuffer> Sealed for WithBuffer<B> {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct LssBuilder<S: Sealed = NoBuffer> {
    state: S,
    config: LssConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> LssBuilder<S> {
    /// Text kept at the head of the buffer across [`Lss::clear`]; lookups start after it.
    #[must_use = "Sets the preserved buffer prefix"]
    pub fn baseline(mut self, baseline: impl Into<String>) -> Self {
        self.config.baseline = baseline.into();
        self
    }

    #[must_use = "Sets the escaping strategy"]
    pub fn escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.config.escaper = Arc::new(escaper);
        self
    }

    /// Uses an escaper already shared with another component.
    #[must_use = "Sets the escaping strategy"]
    pub fn shared_escaper(mut self, escaper: Arc<dyn Escaper>) -> Self {
        self.config.escaper = escaper;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> LssBuilder<N> {
        LssBuilder { state, config: self.config }
    }
}

impl LssBuilder<NoBuffer> {
    #[must_use = "Creates a new codec builder with the percent escaper and an empty baseline"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the backing buffer the codec reads and rewrites"]
    pub fn buffer<B: BackingBuffer>(self, buffer: B) -> LssBuilder<WithBuffer<B>> {
        self.transition(WithBuffer(buffer))
    }
}

impl<B: BackingBuffer> LssBuilder<WithBuffer<B>> {
    /// Binds the codec to its buffer. Nothing is written.
    #[must_use]
    pub fn build(self) -> Lss<B> {
        let WithBuffer(buffer) = self.state;
        Lss { buffer, baseline: self.config.baseline, escaper: self.config.escaper }
    }
}
