//! A domain-partitioned, scrambled key/value store living in one host string slot.
//!
//! The store composes the two lower layers: values are scrambled with the session cipher
//! (`lss-cipher`) and framed into the backing buffer (`lss-codec`). Every framed key starts
//! with a [`DomainTag`] derived from the session key and a host-supplied domain identifier, so
//! several stores can share one buffer.
//!
//! # Architectural Overview
//!
//! 1.  **[`SessionStore`]**: `get_item` / `set_item` / `remove_item` / `key` / `clear`, with a
//!     read cache and an insertion-ordered key index.
//! 2.  **[`StoreBuilder`]**: typestate builder; [`StoreBuilder::attach`] runs the bootstrap.
//! 3.  **[`KeyChannel`]**: host slot carrying the session key between attaches.
//! 4.  **[`StoreConfig`]**: key length and [`Sharing`] mode, loadable from file + environment.
//!
//! The store is not a confidentiality boundary. The cipher only keeps stored text from being
//! read at a glance.
//!
//! # Examples
//!
//! Reattaching within the same session finds the entries again:
//!
//! ```rust
//! use lss_codec::MemoryBuffer;
//! use lss_store::{Bootstrap, MemoryChannel, SessionStore, StoreError};
//!
//! # fn main() -> Result<(), StoreError> {
//! let buffer = MemoryBuffer::new();
//! let channel = MemoryChannel::new();
//!
//! let mut first = SessionStore::builder()
//!     .backing(buffer.clone(), channel.clone())
//!     .attach("https://example.org")?;
//! assert_eq!(first.bootstrap(), Bootstrap::NoPriorSession);
//! first.set_item("theme", "dark")?;
//!
//! let mut again = SessionStore::builder().backing(buffer, channel).attach("https://example.org")?;
//! assert_eq!(again.bootstrap(), Bootstrap::PriorSessionSameShape);
//! assert_eq!(again.get_item("theme")?.as_deref(), Some("dark"));
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod builder;
mod channel;
mod config;
mod domain;
mod engine;
mod error;
mod session;

pub use bootstrap::Bootstrap;
pub use builder::{NoBacking, StoreBuilder, WithBacking};
pub use channel::{KeyChannel, MemoryChannel};
pub use crate::config::{Sharing, StoreConfig};
pub use domain::{DomainTag, TAG_END};
pub use engine::SessionStore;
pub use error::{ErrorKind, StoreError, StoreErrorExt};

pub mod prelude {
    pub use crate::bootstrap::Bootstrap;
    pub use crate::channel::{KeyChannel, MemoryChannel};
    pub use crate::config::{Sharing, StoreConfig};
    pub use crate::engine::SessionStore;
    pub use crate::error::{ErrorKind, StoreError, StoreErrorExt};
}
