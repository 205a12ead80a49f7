use core::ops::Index;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered tile values where each value in `1..=pair_count` appears exactly twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TileValue>", into = "Vec<TileValue>")]
pub struct Board {
    values: Vec<TileValue>,
}

impl Board {
    pub fn from_values(values: Vec<TileValue>) -> Result<Self> {
        if values.is_empty() || values.len() % 2 != 0 || values.len() > usize::from(TileIndex::MAX) {
            return Err(GameError::InvalidBoard);
        }

        let pair_count = values.len() / 2;
        let mut seen = vec![0u8; pair_count];
        for &value in &values {
            let slot = usize::from(value)
                .checked_sub(1)
                .and_then(|i| seen.get_mut(i))
                .ok_or(GameError::InvalidBoard)?;
            *slot += 1;
            if *slot > 2 {
                return Err(GameError::InvalidBoard);
            }
        }

        Ok(Self { values })
    }

    pub(crate) fn new_unchecked(values: Vec<TileValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> TileIndex {
        // bounded by `from_values`
        self.values.len() as TileIndex
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn pair_count(&self) -> CellCount {
        self.len() / 2
    }

    pub fn values(&self) -> &[TileValue] {
        &self.values
    }

    pub fn value_at(&self, index: TileIndex) -> Option<TileValue> {
        self.values.get(usize::from(index)).copied()
    }

    pub fn validate_index(&self, index: TileIndex) -> Result<TileIndex> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex {
                index,
                len: self.len(),
            })
        }
    }

    pub fn is_pair(&self, pair: TilePair) -> bool {
        pair.first != pair.second && self[pair.first] == self[pair.second]
    }
}

impl Index<TileIndex> for Board {
    type Output = TileValue;

    fn index(&self, index: TileIndex) -> &Self::Output {
        &self.values[usize::from(index)]
    }
}

impl TryFrom<Vec<TileValue>> for Board {
    type Error = GameError;

    fn try_from(values: Vec<TileValue>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<Board> for Vec<TileValue> {
    fn from(board: Board) -> Self {
        board.values
    }
}
