//! The [`SessionStore`] handle and its runtime operations.

use crate::bootstrap::Bootstrap;
use crate::builder::{NoBacking, StoreBuilder};
use crate::config::Sharing;
use crate::domain::DomainTag;
use crate::error::{StoreError, StoreErrorExt};
use crate::session::{Session, open, seal};
use lss_codec::{BackingBuffer, MemoryBuffer};

#[derive(Debug)]
pub(crate) enum State<B: BackingBuffer> {
    Ready(Box<Session<B>>),
    Unusable,
}

/// A domain's view of a shared, scrambled buffer.
///
/// Values are encrypted under the session key before framing and every framed key carries the
/// store's [`DomainTag`], so several domains can live in one buffer without seeing each other.
/// Decrypted values are cached per key; the buffer stays the source of truth.
///
/// A store whose key channel rejected the session key is unusable: [`SessionStore::is_available`]
/// is `false` and every operation fails with [`StoreError::StorageUnavailable`].
///
/// # Example
///
/// ```rust
/// use lss_codec::MemoryBuffer;
/// use lss_store::{MemoryChannel, SessionStore, StoreError};
///
/// # fn main() -> Result<(), StoreError> {
/// let mut store = SessionStore::builder()
///     .backing(MemoryBuffer::new(), MemoryChannel::new())
///     .attach("https://example.org")?;
///
/// store.set_item("name", "Ann")?;
/// assert_eq!(store.get_item("name")?.as_deref(), Some("Ann"));
/// assert_eq!(store.key(0)?, "name");
///
/// store.remove_item("name")?;
/// assert_eq!(store.get_item("name")?, None);
/// assert!(store.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionStore<B: BackingBuffer = MemoryBuffer> {
    pub(crate) state: State<B>,
    pub(crate) bootstrap: Bootstrap,
}

impl SessionStore<MemoryBuffer> {
    #[must_use = "The store is not attached until you call .backing(..).attach(..)"]
    pub fn builder() -> StoreBuilder<NoBacking> {
        StoreBuilder::new()
    }
}

impl<B: BackingBuffer> SessionStore<B> {
    pub(crate) fn ready(session: Session<B>, bootstrap: Bootstrap) -> Self {
        Self { state: State::Ready(Box::new(session)), bootstrap }
    }

    pub(crate) const fn unusable() -> Self {
        Self { state: State::Unusable, bootstrap: Bootstrap::Unusable }
    }

    fn session(&self) -> Result<&Session<B>, StoreError> {
        match &self.state {
            State::Ready(session) => Ok(&**session),
            State::Unusable => Err(StoreError::unavailable()),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session<B>, StoreError> {
        match &mut self.state {
            State::Ready(session) => Ok(&mut **session),
            State::Unusable => Err(StoreError::unavailable()),
        }
    }

    /// Returns the value stored under `key`, decrypting and caching it on first access.
    ///
    /// # Errors
    /// * [`StoreError::StorageUnavailable`] if the store is unusable.
    /// * [`StoreError::Codec`] if the buffer cannot be parsed.
    /// * [`StoreError::Corrupted`] if the stored value does not decrypt.
    pub fn get_item(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let session = self.session_mut()?;
        let framed = session.tag.tagged(key);

        if let Some(hit) = session.cache.get(&framed) {
            return Ok(Some(hit.clone()));
        }

        let Some(sealed) = session.codec.get(&framed).context("get_item")? else {
            return Ok(None);
        };
        let value = open(&session.cipher, &sealed)?;
        session.cache.insert(framed, value.clone());
        Ok(Some(value))
    }

    /// Stores `value` under `key`. A key that was already present moves to the end of the
    /// key index.
    ///
    /// # Errors
    /// * [`StoreError::StorageUnavailable`] if the store is unusable.
    /// * [`StoreError::Codec`] of kind `StorageFull` if the buffer did not keep the write. The
    ///   buffer, the cache and the key index are then exactly as before the call.
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let session = self.session_mut()?;
        let framed = session.tag.tagged(key);
        let sealed = seal(&session.cipher, value);

        session.codec.set(&framed, &sealed).context("set_item")?;

        session.forget(key);
        session.index.push(key.to_owned());
        session.cache.insert(framed, value.to_owned());
        Ok(())
    }

    /// Removes `key`. Returns whether it was present.
    ///
    /// # Errors
    /// See [`SessionStore::set_item`].
    pub fn remove_item(&mut self, key: &str) -> Result<bool, StoreError> {
        let session = self.session_mut()?;
        let framed = session.tag.tagged(key);

        let removed = session.codec.del(&framed).context("remove_item")?;
        session.cache.remove(&framed);
        if removed {
            session.forget(key);
        }
        Ok(removed)
    }

    /// The `index`-th key in insertion order.
    ///
    /// # Errors
    /// * [`StoreError::InvalidArgument`] if `index >= len()`.
    /// * [`StoreError::StorageUnavailable`] if the store is unusable.
    pub fn key(&self, index: usize) -> Result<&str, StoreError> {
        let session = self.session()?;
        session.index.get(index).map(String::as_str).ok_or_else(|| StoreError::InvalidArgument {
            message: format!("index {index} is out of range for {} keys", session.index.len())
                .into(),
            context: Some("key".into()),
        })
    }

    /// Removes every entry of this domain. The session key and domain tag stay.
    ///
    /// In exclusive mode the buffer is reset to the baseline. In shared mode only this domain's
    /// frames are cut out, so entries other domains appended later survive.
    ///
    /// # Errors
    /// See [`SessionStore::set_item`].
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let session = self.session_mut()?;

        match session.sharing {
            Sharing::Exclusive => session.codec.clear().context("clear")?,
            Sharing::Shared => {
                let tag = &session.tag;
                session.codec.retain(|framed| !tag.owns(framed)).context("clear")?;
            },
        }

        session.cache.clear();
        session.index.clear();
        Ok(())
    }

    /// # Errors
    /// See [`SessionStore::get_item`].
    pub fn contains_key(&self, key: &str) -> Result<bool, StoreError> {
        let session = self.session()?;
        let framed = session.tag.tagged(key);

        if session.cache.contains_key(&framed) {
            return Ok(true);
        }
        session.codec.contains(&framed).context("contains_key")
    }

    /// Number of keys; zero for an unusable store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        match &self.state {
            State::Ready(session) => session.index.as_slice(),
            State::Unusable => &[],
        }
    }

    #[must_use]
    pub fn domain_tag(&self) -> Option<&DomainTag> {
        self.session().ok().map(|s| &s.tag)
    }

    /// Which attach path produced this store.
    #[must_use]
    pub const fn bootstrap(&self) -> Bootstrap {
        self.bootstrap
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self.bootstrap, Bootstrap::Unusable)
    }

    /// The backing buffer, unless the store is unusable.
    #[must_use]
    pub fn buffer(&self) -> Option<&B> {
        self.session().ok().map(|s| s.codec.buffer())
    }
}
