//! Linear String Storage: unique key/value pairs kept inside one flat string.
//!
//! The whole store is the contents of a single host slot (a [`BackingBuffer`]). Each entry is
//! a frame (see [`frame`]) introduced by a reserved separator that escaped text can never
//! contain, so frames can be appended, located and cut out with plain string operations.
//!
//! # Architectural Overview
//!
//! 1.  **[`Lss`]**: get/set/del/keys/clear over one buffer, one write per mutation.
//! 2.  **[`LssBuilder`]**: typestate builder; a buffer is required, baseline and escaper are not.
//! 3.  **[`Escaper`]**: injectable escaping strategy, [`PercentEscaper`] by default.
//! 4.  **[`MemoryBuffer`]**: shared in-memory slot with an optional capacity.
//!
//! Writes are verified by reading the buffer back. A slot that silently drops data surfaces
//! as [`CodecError::StorageFull`] and the previous contents are put back.
//!
//! ```rust
//! use lss_codec::{BackingBuffer, Lss, MemoryBuffer};
//!
//! # fn main() -> Result<(), lss_codec::CodecError> {
//! let slot = MemoryBuffer::new();
//! let mut lss = Lss::builder().buffer(slot.clone()).build();
//!
//! lss.set("greeting", "hello world")?;
//! assert_eq!(slot.read(), "\u{1}greeting.8\u{1}13\u{1}hello%20world");
//! # Ok(())
//! # }
//! ```

mod buffer;
mod builder;
mod engine;
mod error;
mod escape;
pub mod frame;

pub use buffer::{BackingBuffer, MemoryBuffer};
pub use builder::{LssBuilder, NoBuffer, WithBuffer};
pub use engine::Lss;
pub use error::{CodecError, CodecErrorExt};
pub use escape::{Escaper, PercentEscaper, is_frame_safe};

pub mod prelude {
    pub use crate::buffer::{BackingBuffer, MemoryBuffer};
    pub use crate::engine::Lss;
    pub use crate::error::{CodecError, CodecErrorExt};
    pub use crate::escape::{Escaper, PercentEscaper};
}
