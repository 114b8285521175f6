//! Canonical collision pairs.
//!
//! A [`Collision`] names two bodies by `(entity_index, body_index)`. The
//! constructor orders the two sides so the smaller identity is always `self`,
//! which makes equality, hashing and ordering depend only on the unordered
//! pair. A `HashSet<Collision>` therefore deduplicates a pair found from
//! either side or through several shared cells.

use serde::{Deserialize, Serialize};

/// An unordered overlap between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Collision {
    // Field order drives the derived `Ord`: by self identity, then other.
    self_entity_index: usize,
    self_body_index: usize,
    other_entity_index: usize,
    other_body_index: usize,
}

impl Collision {
    /// Build a collision from two body identities in any order.
    pub fn new(
        self_entity_index: usize,
        other_entity_index: usize,
        self_body_index: usize,
        other_body_index: usize,
    ) -> Self {
        Self::between(
            (self_entity_index, self_body_index),
            (other_entity_index, other_body_index),
        )
    }

    /// Build a collision from two `(entity_index, body_index)` identities.
    pub fn between(a: (usize, usize), b: (usize, usize)) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self {
            self_entity_index: lo.0,
            self_body_index: lo.1,
            other_entity_index: hi.0,
            other_body_index: hi.1,
        }
    }

    #[inline]
    pub fn self_entity_index(&self) -> usize {
        self.self_entity_index
    }

    #[inline]
    pub fn other_entity_index(&self) -> usize {
        self.other_entity_index
    }

    #[inline]
    pub fn self_body_index(&self) -> usize {
        self.self_body_index
    }

    #[inline]
    pub fn other_body_index(&self) -> usize {
        self.other_body_index
    }

    /// Both identities, smaller first.
    #[inline]
    pub fn identities(&self) -> ((usize, usize), (usize, usize)) {
        (
            (self.self_entity_index, self.self_body_index),
            (self.other_entity_index, self.other_body_index),
        )
    }

    /// Returns `true` if either side belongs to `entity_index`.
    pub fn involves(&self, entity_index: usize) -> bool {
        self.self_entity_index == entity_index || self.other_entity_index == entity_index
    }

    /// The partner of body `(entity_index, body_index)` in this collision, or
    /// `None` if that body is not part of it.
    pub fn other(&self, entity_index: usize, body_index: usize) -> Option<(usize, usize)> {
        let (a, b) = self.identities();
        let me = (entity_index, body_index);
        if a == me {
            Some(b)
        } else if b == me {
            Some(a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
