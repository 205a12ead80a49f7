use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Running,
    Won,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Flip, match and win rules for one playthrough.
///
/// All mutation happens through [`press_tile`](Self::press_tile),
/// [`resolve_mismatch`](Self::resolve_mismatch) and [`tick`](Self::tick). The mismatch delay and the tick cadence
/// belong to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    config: GameConfig,
    board: Board,
    tiles: Vec<TileState>,
    open: OpenSelection,
    steps: StepCount,
    timer: GameTimer,
    state: EngineState,
    matched_count: CellCount,
}

impl PlayEngine {
    pub fn new(config: GameConfig, board: Board) -> Self {
        if board.len() != config.grid.board_len() {
            log::warn!(
                "Board of {} tiles does not fill a {}x{} grid",
                board.len(),
                config.grid.side(),
                config.grid.side()
            );
        }
        let tiles = vec![TileState::HIDDEN; usize::from(board.len())];
        Self {
            config,
            board,
            tiles,
            open: OpenSelection::new(),
            steps: 0,
            timer: GameTimer::new(config.timer),
            state: EngineState::Running,
            matched_count: 0,
        }
    }

    /// Fresh shuffled game for `config`.
    pub fn generate(config: GameConfig) -> Self {
        Self::new(config, generate_for(config.grid))
    }

    /// Rebuilds a game from a checkpoint. The timer stays paused until the next press.
    pub fn from_snapshot(config: GameConfig, snapshot: &SavedGame) -> Result<Self> {
        let (board, tiles, open) = snapshot.validate(&config)?;
        let matched_count = tiles.iter().filter(|tile| tile.matched).count() as CellCount;
        Ok(Self {
            config,
            board,
            tiles,
            open,
            steps: snapshot.steps,
            timer: GameTimer::with_value(config.timer, snapshot.time_left),
            state: EngineState::Running,
            matched_count,
        })
    }

    pub fn snapshot(&self) -> SavedGame {
        SavedGame {
            numbers: self.board.values().to_vec(),
            flipped: self.tiles.iter().map(|tile| tile.flipped).collect(),
            matched: self.tiles.iter().map(|tile| tile.matched).collect(),
            steps: self.steps,
            time_left: self.timer.value(),
            difficulty: self.config.difficulty,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    pub fn tile_at(&self, index: TileIndex) -> Option<TileState> {
        self.tiles.get(usize::from(index)).copied()
    }

    pub fn open_selection(&self) -> &OpenSelection {
        &self.open
    }

    pub fn step_count(&self) -> StepCount {
        self.steps
    }

    pub fn matched_count(&self) -> CellCount {
        self.matched_count
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    /// Clock as displayed: elapsed or remaining seconds depending on the mode.
    pub fn seconds(&self) -> Seconds {
        self.timer.value()
    }

    /// Two open tiles with different values waiting for [`resolve_mismatch`](Self::resolve_mismatch).
    pub fn pending_mismatch(&self) -> Option<TilePair> {
        self.open.pair().filter(|&pair| !self.board.is_pair(pair))
    }

    pub fn can_press(&self, index: TileIndex) -> bool {
        !self.state.is_finished()
            && !self.open.is_full()
            && self.tile_at(index).is_some_and(TileState::is_hidden)
    }

    pub fn press_tile(&mut self, index: TileIndex) -> Result<PressOutcome> {
        let index = self.board.validate_index(index)?;
        self.check_running()?;

        if !self.can_press(index) {
            return Ok(PressOutcome::NoChange);
        }

        if !self.timer.is_running() {
            log::debug!("First press, starting timer");
            self.timer.start();
        }
        self.steps = self.steps.saturating_add(1);
        self.tiles[usize::from(index)].flipped = true;
        self.open.push(index);

        let Some(pair) = self.open.pair() else {
            return Ok(PressOutcome::Flipped(index));
        };

        if !self.board.is_pair(pair) {
            log::debug!("Mismatch on {:?}", pair);
            return Ok(PressOutcome::Mismatched(pair));
        }

        for index in [pair.first, pair.second] {
            self.tiles[usize::from(index)].matched = true;
        }
        self.matched_count += 2;
        self.open.clear();
        log::debug!("Matched {:?}, {}/{} tiles", pair, self.matched_count, self.board.len());

        if self.matched_count == self.board.len() {
            Ok(PressOutcome::Won(pair, self.finish()))
        } else {
            Ok(PressOutcome::Matched(pair))
        }
    }

    /// Hides a pending mismatch again, whichever pair it is.
    pub fn resolve_mismatch(&mut self) -> ResolveOutcome {
        match self.pending_mismatch() {
            Some(pair) => self.hide_pair(pair),
            None => ResolveOutcome::NoChange,
        }
    }

    /// Hides `pair` only if it is still the pending mismatch, so a late callback cannot touch a newer round.
    pub fn resolve_mismatch_for(&mut self, pair: TilePair) -> ResolveOutcome {
        if self.pending_mismatch() == Some(pair) {
            self.hide_pair(pair)
        } else {
            log::debug!("Ignoring stale mismatch resolution for {:?}", pair);
            ResolveOutcome::NoChange
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            return TickOutcome::Idle;
        }
        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            log::debug!("Countdown reached zero");
        } else {
            log::trace!("Tick: {:?}", outcome);
        }
        outcome
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    fn hide_pair(&mut self, pair: TilePair) -> ResolveOutcome {
        for index in [pair.first, pair.second] {
            self.tiles[usize::from(index)].flipped = false;
        }
        self.open.clear();
        ResolveOutcome::Resolved(pair)
    }

    fn finish(&mut self) -> WinSummary {
        self.timer.pause();
        self.state = EngineState::Won;
        let summary = WinSummary::new(self.steps, self.timer.elapsed_seconds(), self.config.difficulty);
        log::debug!("Game won: {:?}", summary);
        summary
    }

    fn check_running(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
