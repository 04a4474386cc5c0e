//! Node identity.
//!
//! Elements and component references receive a [`NodeId`] when they are
//! constructed. Cloning a [`Node`](crate::Node) shares the underlying
//! allocation and therefore the id, so two positions holding clones of the
//! same node are the *same* node for caching purposes, while two separately
//! constructed nodes with equal contents are not.

use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier allocated to every element and component node at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Allocates a fresh identifier.
    ///
    /// # Panics
    ///
    /// Panics if the process has allocated `u64::MAX` identifiers.
    #[must_use]
    pub fn next() -> Self {
        let raw = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(raw).expect("node id counter should not overflow"))
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
