use crate::config::Sharing;
use crate::domain::DomainTag;
use crate::error::StoreError;
use fxhash::FxHashMap;
use lss_cipher::{Rc4, latin1};
use lss_codec::{BackingBuffer, Lss};

/// Everything a ready store holds.
#[derive(Debug)]
pub(crate) struct Session<B: BackingBuffer> {
    pub(crate) codec: Lss<B>,
    pub(crate) cipher: Rc4,
    pub(crate) tag: DomainTag,
    pub(crate) sharing: Sharing,
    /// Decrypted values by framed key.
    pub(crate) cache: FxHashMap<String, String>,
    /// User keys in insertion order.
    pub(crate) index: Vec<String>,
}

impl<B: BackingBuffer> Session<B> {
    pub(crate) fn new(codec: Lss<B>, cipher: Rc4, tag: DomainTag, sharing: Sharing) -> Self {
        Self { codec, cipher, tag, sharing, cache: FxHashMap::default(), index: Vec::new() }
    }

    pub(crate) fn forget(&mut self, key: &str) {
        if let Some(pos) = self.index.iter().position(|k| k == key) {
            self.index.remove(pos);
        }
    }
}

/// Encrypts a value for framing: UTF-8 bytes through the cipher, rendered as a byte string.
pub(crate) fn seal(cipher: &Rc4, plaintext: &str) -> String {
    latin1::encode(&cipher.transform(plaintext.as_bytes()))
}

/// Inverse of [`seal`].
pub(crate) fn open(cipher: &Rc4, sealed: &str) -> Result<String, StoreError> {
    let bytes = latin1::decode(sealed).map_err(|e| StoreError::Corrupted {
        message: e.to_string().into(),
        context: Some("stored ciphertext".into()),
    })?;

    String::from_utf8(cipher.transform(bytes)).map_err(|_| StoreError::Corrupted {
        message: "value does not decrypt to UTF-8 under the session key".into(),
        context: None,
    })
}
