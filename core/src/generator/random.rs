use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Lays out two copies of every value in `1..=pair_count` and shuffles them with a seeded RNG.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, pair_count: CellCount) -> Board {
        let pair_count = if pair_count == 0 {
            log::warn!("Board requested with no pairs, generating a single pair instead");
            1
        } else if pair_count > TileIndex::MAX / 2 {
            log::warn!(
                "Board requested with {} pairs, clamped to {}",
                pair_count,
                TileIndex::MAX / 2
            );
            TileIndex::MAX / 2
        } else {
            pair_count
        };

        let mut values: Vec<TileValue> = (1..=pair_count).chain(1..=pair_count).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        values.shuffle(&mut rng);

        log::debug!("Generated board of {} pairs from seed {}", pair_count, self.seed);
        Board::new_unchecked(values)
    }
}
