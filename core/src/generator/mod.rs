use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, pair_count: CellCount) -> Board;
}

/// Fresh shuffled board, re-seeded from entropy on every call.
pub fn generate(pair_count: CellCount) -> Board {
    RandomBoardGenerator::from_entropy().generate(pair_count)
}

/// Fresh shuffled board sized for `grid`.
pub fn generate_for(grid: GridConfig) -> Board {
    generate(grid.pair_count())
}
