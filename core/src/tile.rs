use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Player-visible state of a single tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    pub flipped: bool,
    pub matched: bool,
}

impl TileState {
    pub const HIDDEN: Self = Self {
        flipped: false,
        matched: false,
    };

    pub const MATCHED: Self = Self {
        flipped: true,
        matched: true,
    };

    pub const fn is_hidden(self) -> bool {
        !self.flipped && !self.matched
    }

    /// Flipped this round and still waiting for its partner.
    pub const fn is_open(self) -> bool {
        self.flipped && !self.matched
    }

    /// A matched tile is always shown.
    pub const fn is_consistent(self) -> bool {
        !self.matched || self.flipped
    }
}

/// Tiles flipped but not yet resolved this round, in press order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenSelection(SmallVec<[TileIndex; 2]>);

impl OpenSelection {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= Self::CAPACITY
    }

    pub fn as_slice(&self) -> &[TileIndex] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: TileIndex) {
        debug_assert!(!self.is_full(), "open selection overflow");
        self.0.push(index);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    /// The pair once two tiles are open.
    pub fn pair(&self) -> Option<TilePair> {
        match self.0.as_slice() {
            &[first, second] => Some(TilePair::new(first, second)),
            _ => None,
        }
    }
}

impl FromIterator<TileIndex> for OpenSelection {
    fn from_iter<I: IntoIterator<Item = TileIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
