/// Grid side length, the board is always `side × side` cells.
pub type Side = u8;

/// Count type used for cell, tile and pair counts.
pub type CellCount = u16;

/// Position of a tile inside [`Board`](crate::Board) values.
pub type TileIndex = CellCount;

/// Face value printed on a tile, pairs share the same value.
pub type TileValue = CellCount;

/// Whole seconds, used for both elapsed and remaining time.
pub type Seconds = u32;

/// Number of accepted tile presses.
pub type StepCount = u32;

/// Final score of a won game.
pub type Score = u32;

pub const fn square(side: Side) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

/// Two tiles flipped in the same round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePair {
    pub first: TileIndex,
    pub second: TileIndex,
}

impl TilePair {
    pub const fn new(first: TileIndex, second: TileIndex) -> Self {
        Self { first, second }
    }
}
