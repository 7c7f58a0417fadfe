//! Domain tags and baseline markers.

use lss_cipher::{Rc4, latin1};
use lss_codec::Escaper;
use lss_codec::frame::MARK;

/// Closes every tag. Lies above U+00FF, so it never occurs inside a tag body and no tag can be
/// a prefix of another.
pub const TAG_END: char = '\u{203A}';

/// The scrambled domain identifier that prefixes every framed key of one store.
#[derive(Clone, PartialEq, Eq)]
pub struct DomainTag(String);

impl std::fmt::Debug for DomainTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DomainTag").field(&self.0.chars().count()).finish()
    }
}

impl DomainTag {
    /// Scrambles `domain` (as UTF-8) under the session cipher.
    #[must_use]
    pub fn derive(cipher: &Rc4, domain: &str) -> Self {
        let mut tag = latin1::encode(&cipher.transform(domain.as_bytes()));
        tag.push(TAG_END);
        Self(tag)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The framed form of a user key.
    #[must_use]
    pub fn tagged(&self, key: &str) -> String {
        let mut tagged = String::with_capacity(self.0.len() + key.len());
        tagged.push_str(&self.0);
        tagged.push_str(key);
        tagged
    }

    /// The user key behind a framed key, if the framed key belongs to this domain.
    #[must_use]
    pub fn strip<'a>(&self, framed: &'a str) -> Option<&'a str> {
        framed.strip_prefix(self.0.as_str())
    }

    #[must_use]
    pub fn owns(&self, framed: &str) -> bool {
        framed.starts_with(self.0.as_str())
    }

    /// Text this store leaves at the end of its baseline. Contains no frame separator.
    #[must_use]
    pub fn marker(&self, escaper: &dyn Escaper) -> String {
        let mut marker = String::from(MARK);
        marker.push_str(&escaper.escape(&self.0));
        marker.push(MARK);
        marker
    }
}
