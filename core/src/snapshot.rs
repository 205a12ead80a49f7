use serde::{Deserialize, Serialize};

use crate::*;

/// Persisted projection of an in-progress game.
///
/// Field names follow the stored JSON layout:
/// `{numbers, flipped, matched, steps, timeLeft, difficulty}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub numbers: Vec<TileValue>,
    pub flipped: Vec<bool>,
    pub matched: Vec<bool>,
    pub steps: StepCount,
    /// Elapsed seconds for count-up games, remaining seconds for count-down games.
    pub time_left: Seconds,
    pub difficulty: Difficulty,
}

impl SavedGame {
    pub fn tile_states(&self) -> impl Iterator<Item = TileState> + '_ {
        self.flipped
            .iter()
            .zip(&self.matched)
            .map(|(&flipped, &matched)| TileState { flipped, matched })
    }

    /// Shape checks against `config`, returning the pieces needed to rebuild the engine.
    pub(crate) fn validate(&self, config: &GameConfig) -> Result<(Board, Vec<TileState>, OpenSelection)> {
        use SnapshotDefect::*;

        if self.difficulty != config.difficulty {
            return Err(DifficultyMismatch.into());
        }

        let len = self.numbers.len();
        if self.flipped.len() != len || self.matched.len() != len {
            return Err(LengthMismatch.into());
        }
        if len != usize::from(config.grid.board_len()) {
            return Err(GridMismatch.into());
        }

        let board = Board::from_values(self.numbers.clone()).map_err(|_| InvalidBoard)?;

        let tiles: Vec<TileState> = self.tile_states().collect();
        if !tiles.iter().all(|tile| tile.is_consistent()) {
            return Err(MatchedNotFlipped.into());
        }
        if tiles.iter().all(|tile| tile.matched) {
            return Err(AlreadyWon.into());
        }

        let open: OpenSelection = tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_open())
            // bounded by the board length check above
            .map(|(index, _)| index as TileIndex)
            .collect();
        if open.len() > OpenSelection::CAPACITY {
            return Err(TooManyOpen.into());
        }
        if let Some(pair) = open.pair()
            && board.is_pair(pair)
        {
            return Err(UnresolvedMatch.into());
        }

        if let TimerMode::CountDown { budget } = config.timer
            && self.time_left > budget
        {
            return Err(TimeOutOfRange.into());
        }

        Ok((board, tiles, open))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy_save() -> SavedGame {
        SavedGame {
            numbers: vec![1, 2, 1, 2],
            flipped: vec![true, false, true, false],
            matched: vec![true, false, true, false],
            steps: 2,
            time_left: 4,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn json_layout_matches_stored_keys() {
        let json = serde_json::to_value(easy_save()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "numbers": [1, 2, 1, 2],
                "flipped": [true, false, true, false],
                "matched": [true, false, true, false],
                "steps": 2,
                "timeLeft": 4,
                "difficulty": "easy2",
            })
        );
    }

    #[test]
    fn valid_save_rebuilds_parts() {
        let (board, tiles, open) = easy_save().validate(&GameConfig::new(Difficulty::Easy)).unwrap();
        assert_eq!(board.values(), &[1, 2, 1, 2]);
        assert_eq!(tiles[0], TileState::MATCHED);
        assert!(open.is_empty());
    }

    #[test]
    fn single_open_tile_is_restored_into_selection() {
        let mut save = easy_save();
        save.flipped[1] = true;
        let (_, _, open) = save.validate(&GameConfig::new(Difficulty::Easy)).unwrap();
        assert_eq!(open.as_slice(), &[1]);
    }

    #[test]
    fn defects_are_reported() {
        let config = GameConfig::new(Difficulty::Easy);
        let check = |save: SavedGame| save.validate(&config).err();

        let mut save = easy_save();
        save.matched.pop();
        assert_eq!(check(save), Some(SnapshotDefect::LengthMismatch.into()));

        let mut save = easy_save();
        save.flipped[0] = false;
        assert_eq!(check(save), Some(SnapshotDefect::MatchedNotFlipped.into()));

        let mut save = easy_save();
        save.numbers = vec![1, 1, 1, 2];
        assert_eq!(check(save), Some(SnapshotDefect::InvalidBoard.into()));

        let mut save = easy_save();
        save.difficulty = Difficulty::Medium;
        assert_eq!(check(save), Some(SnapshotDefect::DifficultyMismatch.into()));

        let mut save = easy_save();
        save.flipped = vec![true; 4];
        save.matched = vec![true; 4];
        assert_eq!(check(save), Some(SnapshotDefect::AlreadyWon.into()));

        let mut save = easy_save();
        save.numbers = vec![1, 1, 2, 2];
        save.matched = vec![false; 4];
        save.flipped = vec![true, true, false, false];
        assert_eq!(check(save), Some(SnapshotDefect::UnresolvedMatch.into()));
    }

    #[test]
    fn countdown_time_must_fit_budget() {
        let config = GameConfig::new(Difficulty::SuperHard);
        let save = SavedGame {
            numbers: RandomBoardGenerator::new(5).generate(40).into(),
            flipped: vec![false; 80],
            matched: vec![false; 80],
            steps: 0,
            time_left: 101,
            difficulty: Difficulty::SuperHard,
        };
        assert_eq!(
            save.validate(&config).err(),
            Some(SnapshotDefect::TimeOutOfRange.into())
        );
    }

    #[test]
    fn grid_size_must_match() {
        let config = GameConfig::new(Difficulty::Easy);
        let save = SavedGame {
            numbers: vec![1, 1, 2, 2, 3, 3],
            flipped: vec![false; 6],
            matched: vec![false; 6],
            steps: 0,
            time_left: 0,
            difficulty: Difficulty::Easy,
        };
        assert_eq!(
            save.validate(&config).err(),
            Some(SnapshotDefect::GridMismatch.into())
        );
    }
}
