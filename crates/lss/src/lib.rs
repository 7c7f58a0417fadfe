//! Facade crate for the linear string store.
//! Re-exports the cipher, the frame codec and the partitioned session store.
//! Keep this crate thin: it composes the layer crates and implements nothing itself.
//!
//! ## Usage
//! - Most hosts only need [`prelude`]: attach a [`SessionStore`](store::SessionStore) to a
//!   buffer and a key channel, then use `get_item` / `set_item`.
//! - Reach for [`codec`] directly to keep unscrambled frames in a string slot, and for
//!   [`cipher`] to scramble standalone strings.
//!
//! ```rust
//! use lss::prelude::*;
//!
//! # fn main() -> Result<(), StoreError> {
//! let mut store = SessionStore::builder()
//!     .sharing(Sharing::Exclusive)
//!     .backing(MemoryBuffer::new(), MemoryChannel::new())
//!     .attach("https://example.org")?;
//!
//! store.set_item("name", "Ann")?;
//! assert_eq!(store.get_item("name")?.as_deref(), Some("Ann"));
//! # Ok(())
//! # }
//! ```

pub use lss_cipher as cipher;
pub use lss_codec as codec;
pub use lss_store as store;

pub mod prelude {
    pub use lss_cipher::{Rc4, SessionKey};
    pub use lss_codec::{BackingBuffer, Escaper, Lss, MemoryBuffer, PercentEscaper};
    pub use lss_store::prelude::*;
}
