//! The emission sequence: an ordered buffer of lazily realized output.
//!
//! Rendering does not write markup directly. It registers *segment sources*
//! in a [`Sequence`]:
//!
//! - ready text ([`push_str`](Sequence::push_str));
//! - a deferred producer of text, run at realization time ([`emit`](Sequence::emit));
//! - a nested sequence filled by a producer at realization time
//!   ([`delegate`](Sequence::delegate)), which may register further sources;
//! - the same, keyed by node identity ([`delegate_cached`](Sequence::delegate_cached)).
//!
//! [`realize`](Sequence::realize) walks the sources in registration order,
//! running producers and flattening nested sequences, so the final text is
//! always the concatenation of the sources in the order they were registered,
//! no matter when each one was computed.
//!
//! ```
//! use pour::Sequence;
//!
//! let mut sequence = Sequence::new();
//! sequence.push_str("<ul>");
//! sequence.delegate(|inner| {
//!     inner.push_str("<li>a</li>");
//!     inner.emit(|| "<li>b</li>".to_owned());
//!     Ok(())
//! });
//! sequence.push_str("</ul>");
//! assert_eq!(sequence.realize().unwrap(), "<ul><li>a</li><li>b</li></ul>");
//! ```

use alloc::{borrow::Cow, boxed::Box, string::String, vec::Vec};
use core::{
    fmt::{self, Debug, Write},
    ops::Range,
};
use std::collections::HashMap;

use pour_core::NodeId;

use crate::{MarkerPlacement, RenderError};

type Producer<'p> = Box<dyn FnOnce(&mut Sequence<'p>) -> Result<(), RenderError> + 'p>;

enum Segment<'p> {
    Text(Cow<'static, str>),
    Deferred(Box<dyn FnOnce() -> String + 'p>),
    Delegate(Producer<'p>),
    Cached(NodeId, Producer<'p>),
    Marker,
}

/// Ordered list of segment sources for one render pass.
#[derive(Default)]
pub struct Sequence<'p> {
    segments: Vec<Segment<'p>>,
}

impl Debug for Sequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl<'p> Sequence<'p> {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends text that is already known.
    pub fn push_str(&mut self, text: impl Into<Cow<'static, str>>) {
        let text = text.into();
        if !text.is_empty() {
            self.segments.push(Segment::Text(text));
        }
    }

    /// Appends a text producer. `producer` runs when the sequence is realized,
    /// not now.
    pub fn emit(&mut self, producer: impl FnOnce() -> String + 'p) {
        self.segments.push(Segment::Deferred(Box::new(producer)));
    }

    /// Appends a nested sequence, filled by `producer` when realized.
    pub fn delegate(
        &mut self,
        producer: impl FnOnce(&mut Sequence<'p>) -> Result<(), RenderError> + 'p,
    ) {
        self.segments.push(Segment::Delegate(Box::new(producer)));
    }

    /// Like [`delegate`](Self::delegate), but if a source with the same `id`
    /// was already realized in this pass its text is reused and `producer`
    /// never runs.
    pub fn delegate_cached(
        &mut self,
        id: NodeId,
        producer: impl FnOnce(&mut Sequence<'p>) -> Result<(), RenderError> + 'p,
    ) {
        self.segments.push(Segment::Cached(id, Box::new(producer)));
    }

    /// Appends a slot for the identity marker. Whether the marker is written
    /// is decided when the pass is written out, so cached output replays the
    /// slot rather than a fixed decision.
    pub(crate) fn push_marker(&mut self) {
        self.segments.push(Segment::Marker);
    }

    /// Number of sources registered at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Realizes the sequence into a string.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a producer.
    pub fn realize(self) -> Result<String, RenderError> {
        let mut out = String::new();
        self.realize_into(&mut out)?;
        Ok(out)
    }

    /// Realizes the sequence, writing each segment to `out` in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a producer or by `out`. Nothing is
    /// written if a producer fails.
    pub fn realize_into<W: Write>(self, out: &mut W) -> Result<(), RenderError> {
        let mut realizer = Realizer::new(true);
        realizer.realize(self)?;
        realizer.write(out, "", MarkerPlacement::None)
    }
}

/// Counters collected while realizing one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Text segments written to the output.
    pub segments: usize,
    /// Nested sequences realized, cached or not.
    pub delegated: usize,
    /// Cached sources served from the cache.
    pub cache_hits: usize,
    /// Cached sources realized for the first time.
    pub cache_misses: usize,
    /// Pending computations waited for.
    pub bridge_waits: usize,
}

#[derive(Debug, Clone)]
enum Piece {
    Text(Cow<'static, str>),
    Marker,
}

/// Walks sequences and owns the identity cache of one pass.
///
/// Realized output is kept as an append-only list of pieces. A cached node is
/// stored as the range of pieces its first realization produced, and a cache
/// hit appends a copy of that range.
#[derive(Debug)]
pub(crate) struct Realizer {
    pieces: Vec<Piece>,
    cache: HashMap<NodeId, Range<usize>>,
    caching: bool,
    stats: PassStats,
}

impl Realizer {
    pub(crate) fn new(caching: bool) -> Self {
        Self {
            pieces: Vec::new(),
            cache: HashMap::new(),
            caching,
            stats: PassStats::default(),
        }
    }

    pub(crate) const fn stats(&self) -> PassStats {
        self.stats
    }

    pub(crate) fn realize(&mut self, sequence: Sequence<'_>) -> Result<(), RenderError> {
        for segment in sequence.segments {
            match segment {
                Segment::Text(text) => self.push(text),
                Segment::Deferred(producer) => self.push(Cow::Owned(producer())),
                Segment::Marker => self.pieces.push(Piece::Marker),
                Segment::Delegate(producer) => self.realize_nested(producer)?,
                Segment::Cached(id, producer) if !self.caching => {
                    tracing::trace!(%id, "cache disabled");
                    self.realize_nested(producer)?;
                }
                Segment::Cached(id, producer) => {
                    if let Some(range) = self.cache.get(&id).cloned() {
                        tracing::trace!(%id, pieces = range.len(), "cache hit");
                        self.stats.cache_hits += 1;
                        self.stats.segments += 1;
                        self.pieces.extend_from_within(range);
                        continue;
                    }

                    self.stats.cache_misses += 1;
                    let start = self.pieces.len();
                    self.realize_nested(producer)?;
                    self.cache.insert(id, start..self.pieces.len());
                }
            }
        }
        Ok(())
    }

    /// Writes the realized pieces, deciding marker slots in document order.
    pub(crate) fn write(
        &self,
        out: &mut dyn Write,
        marker: &str,
        placement: MarkerPlacement,
    ) -> Result<(), RenderError> {
        let mut marker_due = placement != MarkerPlacement::None;
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.write_str(text)?,
                Piece::Marker if marker_due => {
                    out.write_str(marker)?;
                    marker_due = placement == MarkerPlacement::Every;
                }
                Piece::Marker => {}
            }
        }
        Ok(())
    }

    fn realize_nested(&mut self, producer: Producer<'_>) -> Result<(), RenderError> {
        self.stats.delegated += 1;
        let mut nested = Sequence::new();
        producer(&mut nested)?;
        self.realize(nested)
    }

    fn push(&mut self, text: Cow<'static, str>) {
        self.stats.segments += 1;
        self.pieces.push(Piece::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    fn written(realizer: &Realizer, placement: MarkerPlacement) -> String {
        let mut out = String::new();
        realizer.write(&mut out, " m", placement).unwrap();
        out
    }

    fn shared_twice(id: NodeId) -> Sequence<'static> {
        let mut sequence = Sequence::new();
        for _ in 0..2 {
            sequence.delegate_cached(id, |inner| {
                inner.push_str("<p");
                inner.push_marker();
                inner.push_str(">");
                Ok(())
            });
        }
        sequence
    }

    #[test]
    fn test_cache_hits_replay_marker_slots() {
        let id = NodeId::next();

        let mut realizer = Realizer::new(true);
        realizer.realize(shared_twice(id)).unwrap();
        assert_eq!(realizer.stats().cache_hits, 1);
        assert_eq!(written(&realizer, MarkerPlacement::Root), "<p m><p>");
        assert_eq!(written(&realizer, MarkerPlacement::Every), "<p m><p m>");
        assert_eq!(written(&realizer, MarkerPlacement::None), "<p><p>");
    }

    #[test]
    fn test_nested_cache_entries_include_replayed_pieces() {
        let inner_id = NodeId::next();
        let outer_id = NodeId::next();
        let mut sequence = Sequence::new();
        for _ in 0..2 {
            sequence.delegate_cached(outer_id, move |outer| {
                outer.push_str("[");
                for _ in 0..2 {
                    outer.delegate_cached(inner_id, |inner| {
                        inner.push_marker();
                        inner.push_str("x");
                        Ok(())
                    });
                }
                outer.push_str("]");
                Ok(())
            });
        }

        let mut realizer = Realizer::new(true);
        realizer.realize(sequence).unwrap();
        assert_eq!(written(&realizer, MarkerPlacement::Root), "[ mxx][xx]");
        assert_eq!(written(&realizer, MarkerPlacement::Every), "[ mx mx][ mx mx]");
    }

    #[test]
    fn test_registration_order_is_output_order() {
        let mut sequence = Sequence::new();
        sequence.push_str("a");
        sequence.delegate(|inner| {
            inner.push_str("b");
            inner.delegate(|deeper| {
                deeper.push_str("c");
                Ok(())
            });
            inner.push_str("d");
            Ok(())
        });
        sequence.push_str("e");
        assert_eq!(sequence.realize().unwrap(), "abcde");
    }

    #[test]
    fn test_emit_runs_at_realization() {
        let counter = Cell::new(0);
        let mut sequence = Sequence::new();
        sequence.emit(|| counter.get().to_string());
        counter.set(7);
        assert_eq!(counter.get(), 7);
        assert_eq!(sequence.realize().unwrap(), "7");
    }

    #[test]
    fn test_delegate_runs_lazily() {
        let ran = Cell::new(false);
        let mut sequence = Sequence::new();
        sequence.delegate(|inner| {
            ran.set(true);
            inner.push_str("x");
            Ok(())
        });
        assert!(!ran.get());
        assert_eq!(sequence.realize().unwrap(), "x");
        assert!(ran.get());
    }

    #[test]
    fn test_cached_producer_runs_once() {
        let id = NodeId::next();
        let runs = Cell::new(0);
        let mut sequence = Sequence::new();
        for _ in 0..3 {
            sequence.delegate_cached(id, |inner| {
                runs.set(runs.get() + 1);
                inner.push_str("<hr>");
                Ok(())
            });
            sequence.push_str("|");
        }
        assert_eq!(sequence.realize().unwrap(), "<hr>|<hr>|<hr>|");
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_cache_disabled_reruns_producer() {
        let id = NodeId::next();
        let runs = Cell::new(0);
        let mut sequence = Sequence::new();
        for _ in 0..2 {
            sequence.delegate_cached(id, |inner| {
                runs.set(runs.get() + 1);
                inner.push_str("x");
                Ok(())
            });
        }
        let mut realizer = Realizer::new(false);
        realizer.realize(sequence).unwrap();
        assert_eq!(written(&realizer, MarkerPlacement::None), "xx");
        assert_eq!(runs.get(), 2);
        assert_eq!(realizer.stats().cache_hits, 0);
    }

    #[test]
    fn test_error_stops_realization() {
        let later = Cell::new(false);
        let mut sequence = Sequence::new();
        sequence.delegate(|_| {
            Err(RenderError::UnknownNodeType {
                descriptor: "boolean true".to_owned(),
            })
        });
        sequence.emit(|| {
            later.set(true);
            String::new()
        });
        let error = sequence.realize().unwrap_err();
        assert!(matches!(error, RenderError::UnknownNodeType { .. }));
        assert!(!later.get());
    }

    #[test]
    fn test_stats() {
        let id = NodeId::next();
        let mut sequence = Sequence::new();
        sequence.push_str("a");
        sequence.delegate_cached(id, |inner| {
            inner.push_str("b");
            Ok(())
        });
        sequence.delegate_cached(id, |_| unreachable!("served from cache"));

        let mut realizer = Realizer::new(true);
        realizer.realize(sequence).unwrap();
        assert_eq!(written(&realizer, MarkerPlacement::None), "abb");

        let stats = realizer.stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.delegated, 1);
        assert_eq!(stats.segments, 3);
    }

    #[test]
    fn test_empty_text_is_not_registered() {
        let mut sequence = Sequence::new();
        sequence.push_str("");
        assert!(sequence.is_empty());
    }
}
