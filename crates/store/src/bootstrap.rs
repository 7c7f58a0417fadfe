//! Attaching a store to a buffer: session key negotiation, shape detection and compaction.
//!
//! A store leaves a marker (see [`DomainTag::marker`]) at the end of its baseline. Whatever
//! precedes the marker is opaque to the store. On reattach the buffer is in the expected shape
//! when that marker occurs exactly once and every frame after it belongs to this domain.
//! Anything else is compacted: this domain's entries are decrypted, cut out of the old image and
//! written again behind a fresh baseline, in one write. Text that does not parse as frames is
//! carried along as foreign content.

use crate::channel::KeyChannel;
use crate::config::{Sharing, StoreConfig};
use crate::domain::{DomainTag, TAG_END};
use crate::engine::SessionStore;
use crate::error::{StoreError, StoreErrorExt};
use crate::session::{Session, open, seal};
use lss_cipher::{Rc4, SessionKey};
use lss_codec::frame::{Frames, MARK, SEP};
use lss_codec::{BackingBuffer, Escaper, Lss};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The path [`attach`](crate::StoreBuilder::attach) took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// No key on the channel: a new key was generated and the buffer given a fresh baseline.
    NoPriorSession,
    /// The buffer was already laid out for this domain and key; nothing was rewritten.
    PriorSessionSameShape,
    /// The buffer was rewritten to hold this domain's entries behind a fresh baseline.
    PriorSessionNeedsCompaction,
    /// The key channel did not keep the key; the store refuses all operations.
    Unusable,
}

/// A frame found in an image. `key` is `None` when the escaper cannot invert it.
struct Scanned<'a> {
    key: Option<String>,
    value: &'a str,
    span: Range<usize>,
}

pub(crate) fn attach<B, C>(
    buffer: B,
    mut channel: C,
    domain: &str,
    config: &StoreConfig,
    escaper: Arc<dyn Escaper>,
) -> Result<SessionStore<B>, StoreError>
where
    B: BackingBuffer,
    C: KeyChannel,
{
    config.validate()?;

    let store = if let Some(key) = prior_key(&channel) {
        reattach(buffer, Rc4::new(&key)?, domain, config.sharing, escaper)?
    } else {
        let Some(key) = establish_key(&mut channel, config.key_length)? else {
            warn!(domain, "Key channel rejected the session key; store is unusable");
            return Ok(SessionStore::unusable());
        };
        start(buffer, Rc4::new(&key)?, domain, config.sharing, escaper)?
    };

    info!(bootstrap = ?store.bootstrap(), entries = store.len(), "Session store attached");
    Ok(store)
}

fn prior_key(channel: &impl KeyChannel) -> Option<SessionKey> {
    let text = channel.read()?;
    match SessionKey::from_channel(&text) {
        Ok(key) => Some(key),
        Err(err) => {
            warn!(error = %err, "Ignoring unreadable key on the key channel");
            None
        },
    }
}

/// Generates a key and hands it to the channel. `None` if the channel does not give it back.
fn establish_key(
    channel: &mut impl KeyChannel,
    length: usize,
) -> Result<Option<SessionKey>, StoreError> {
    let key = SessionKey::generate(length).context("session key")?;
    let text = key.to_channel();

    channel.write(&text);
    Ok((channel.read().as_deref() == Some(text.as_str())).then_some(key))
}

fn start<B: BackingBuffer>(
    buffer: B,
    cipher: Rc4,
    domain: &str,
    sharing: Sharing,
    escaper: Arc<dyn Escaper>,
) -> Result<SessionStore<B>, StoreError> {
    let tag = DomainTag::derive(&cipher, domain);
    let marker = tag.marker(escaper.as_ref());

    let baseline = match sharing {
        Sharing::Shared => reclaim(&buffer.read(), escaper.as_ref()) + &marker,
        Sharing::Exclusive => marker,
    };

    let mut codec =
        Lss::builder().baseline(baseline).shared_escaper(escaper).buffer(buffer).build();
    codec.clear().context("baseline")?;

    Ok(SessionStore::ready(Session::new(codec, cipher, tag, sharing), Bootstrap::NoPriorSession))
}

fn reattach<B: BackingBuffer>(
    buffer: B,
    cipher: Rc4,
    domain: &str,
    sharing: Sharing,
    escaper: Arc<dyn Escaper>,
) -> Result<SessionStore<B>, StoreError> {
    let tag = DomainTag::derive(&cipher, domain);
    let marker = tag.marker(escaper.as_ref());
    let image = buffer.read();

    let adopted = marker_end(&image, &marker, sharing)
        .and_then(|end| Some((end, same_shape(&image, end, &tag, escaper.as_ref())?)));

    if let Some((end, index)) = adopted {
        let codec = Lss::builder()
            .baseline(&image[..end])
            .shared_escaper(escaper)
            .buffer(buffer)
            .build();
        let mut session = Session::new(codec, cipher, tag, sharing);
        session.index = index;
        return Ok(SessionStore::ready(session, Bootstrap::PriorSessionSameShape));
    }

    compact(buffer, &image, cipher, tag, sharing, escaper)
}

/// End of this store's marker, if it occurs exactly once (and first, in exclusive mode).
fn marker_end(image: &str, marker: &str, sharing: Sharing) -> Option<usize> {
    let mut hits = image.match_indices(marker);
    let (at, _) = hits.next()?;
    if hits.next().is_some() || (sharing == Sharing::Exclusive && at != 0) {
        return None;
    }
    Some(at + marker.len())
}

/// User keys of the frames after `end`, if every one of them parses and belongs to `tag`.
fn same_shape(
    image: &str,
    end: usize,
    tag: &DomainTag,
    escaper: &dyn Escaper,
) -> Option<Vec<String>> {
    Frames::new(image, end)
        .map(|raw| {
            let key = escaper.unescape(raw.ok()?.key).ok()?;
            tag.strip(&key).map(str::to_owned)
        })
        .collect()
}

/// Every frame of `image` that parses, in order, and how many unparseable stretches were
/// stepped over. After a broken frame the scan resumes at the next separator; the broken
/// text stays where it is.
fn salvage<'a>(image: &'a str, escaper: &dyn Escaper) -> (Vec<Scanned<'a>>, usize) {
    let mut frames = Vec::new();
    let mut skipped = 0;
    let mut pos = 0;

    loop {
        match Frames::new(image, pos).next() {
            None => break,
            Some(Ok(raw)) => {
                pos = raw.span.end;
                frames.push(Scanned {
                    key: escaper.unescape(raw.key).ok(),
                    value: raw.value,
                    span: raw.span,
                });
            },
            Some(Err(_)) => {
                skipped += 1;
                let Some(start) = image[pos..].find(SEP) else { break };
                pos += start + SEP.len_utf8();
            },
        }
    }

    (frames, skipped)
}

/// `image` without the given spans, which must be ordered and disjoint.
fn cut<'a>(image: &str, spans: impl IntoIterator<Item = &'a Range<usize>>) -> String {
    let mut kept = String::with_capacity(image.len());
    let mut copied = 0;
    for span in spans {
        kept.push_str(&image[copied..span.start]);
        copied = span.end;
    }
    kept.push_str(&image[copied..]);
    kept
}

/// Drops frames and markers that earlier sessions left in an inherited image. Their key is
/// gone with the session, so nothing can read them again. Other text is kept as is.
fn reclaim(image: &str, escaper: &dyn Escaper) -> String {
    let (frames, _) = salvage(image, escaper);
    let stale = frames
        .iter()
        .filter(|f| f.key.as_deref().is_some_and(|k| k.contains(TAG_END)))
        .map(|f| &f.span);
    let kept = cut(image, stale);

    let mut out = String::with_capacity(kept.len());
    let mut rest = kept.as_str();
    while let Some(open) = rest.find(MARK) {
        let after = &rest[open + MARK.len_utf8()..];
        let Some(close) = after.find(MARK) else { break };
        let inner = &after[..close];

        let is_marker = !inner.contains(SEP)
            && escaper.unescape(inner).is_ok_and(|tag| tag.ends_with(TAG_END));
        if is_marker {
            out.push_str(&rest[..open]);
            rest = &after[close + MARK.len_utf8()..];
        } else {
            out.push_str(&rest[..open + MARK.len_utf8()]);
            rest = after;
        }
    }
    out.push_str(rest);

    let dropped = image.len() - out.len();
    if dropped > 0 {
        debug!(dropped, "Reclaimed entries of an ended session");
    }
    out
}

fn compact<B: BackingBuffer>(
    buffer: B,
    image: &str,
    cipher: Rc4,
    tag: DomainTag,
    sharing: Sharing,
    escaper: Arc<dyn Escaper>,
) -> Result<SessionStore<B>, StoreError> {
    let (frames, skipped) = salvage(image, escaper.as_ref());
    if skipped > 0 {
        warn!(skipped, ?sharing, "Buffer holds text that does not parse as frames");
    }

    let mut own = Vec::new();
    let mut spans = Vec::new();
    for frame in &frames {
        let Some(key) = frame.key.as_deref().and_then(|k| tag.strip(k)) else {
            continue;
        };
        let sealed = escaper.unescape(frame.value).context("compaction")?;
        own.push((key.to_owned(), open(&cipher, &sealed).context("compaction")?));
        spans.push(&frame.span);
    }

    let owned = spans.len();
    let marker = tag.marker(escaper.as_ref());
    let baseline = match sharing {
        Sharing::Shared => cut(image, spans).replace(&marker, "") + &marker,
        Sharing::Exclusive => marker,
    };

    let framed: Vec<(String, String)> =
        own.iter().map(|(key, value)| (tag.tagged(key), seal(&cipher, value))).collect();

    let mut codec =
        Lss::builder().baseline(baseline).shared_escaper(escaper).buffer(buffer).build();
    codec
        .rebuild(framed.iter().map(|(key, sealed)| (key.as_str(), sealed.as_str())))
        .context("compaction")?;

    let mut session = Session::new(codec, cipher, tag, sharing);
    for ((key, value), (framed_key, _)) in own.into_iter().zip(framed) {
        session.forget(&key);
        session.index.push(key);
        session.cache.insert(framed_key, value);
    }

    debug!(
        kept = session.index.len(),
        foreign = frames.len() - owned,
        ?sharing,
        "Compacted buffer"
    );
    Ok(SessionStore::ready(session, Bootstrap::PriorSessionNeedsCompaction))
}
