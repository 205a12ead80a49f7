use std::mem;

use web_time::Instant;

use crate::*;

/// Monotonic clock used for checkpoint throttling.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Won,
}

/// One screen's worth of play: the engine plus everything around it that touches storage.
///
/// Storage is best-effort. Every failure is logged and play carries on, a checkpoint that could not be written
/// is retried on the next opportunity (checkpoint, tick or [`flush`](Self::flush)).
#[derive(Debug)]
pub struct GameSession<S, T = SystemClock> {
    store: S,
    clock: T,
    engine: Option<PlayEngine>,
    best_score: Option<Score>,
    gate: CheckpointGate,
    dirty: bool,
    seed: Option<u64>,
    events: Vec<GameEvent>,
}

impl<S: GameStore> GameSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: GameStore, T: TimeSource> GameSession<S, T> {
    pub fn with_clock(store: S, clock: T) -> Self {
        Self {
            store,
            clock,
            engine: None,
            best_score: None,
            gate: CheckpointGate::default(),
            dirty: false,
            seed: None,
            events: Vec::new(),
        }
    }

    /// Fresh boards are shuffled from `seed`, then `seed + 1` and so on.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn state(&self) -> SessionState {
        match &self.engine {
            None => SessionState::Idle,
            Some(engine) if engine.is_won() => SessionState::Won,
            Some(_) => SessionState::Running,
        }
    }

    pub fn engine(&self) -> Option<&PlayEngine> {
        self.engine.as_ref()
    }

    pub fn best_score(&self) -> Option<Score> {
        self.best_score
    }

    /// Whether the latest state has not reached storage yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Starts a game, resuming from `resume` when it is valid for `config`. Returns whether it resumed.
    pub fn start(&mut self, config: GameConfig, resume: Option<SavedGame>) -> bool {
        self.events.clear();
        self.gate.reset();
        self.dirty = false;
        self.best_score = match self.store.load_best_score() {
            Ok(best) => best,
            Err(err) => {
                log::warn!("Could not read best score: {}", err);
                None
            }
        };

        let resumed = resume.and_then(|snapshot| match PlayEngine::from_snapshot(config, &snapshot) {
            Ok(engine) => Some(engine),
            Err(GameError::CorruptSnapshot(SnapshotDefect::DifficultyMismatch)) => {
                log::info!(
                    "Saved {} game does not match {}, starting fresh",
                    snapshot.difficulty,
                    config.difficulty
                );
                None
            }
            Err(err) => {
                log::warn!("Discarding saved game: {}", err);
                None
            }
        });

        let is_resumed = resumed.is_some();
        let engine = match resumed {
            Some(engine) => {
                log::info!(
                    "Resumed {} game at step {}",
                    config.difficulty,
                    engine.step_count()
                );
                engine
            }
            None => {
                let engine = PlayEngine::new(config, self.fresh_board(config.grid));
                log::info!("Started {} game with {} tiles", config.difficulty, engine.board().len());
                engine
            }
        };
        self.engine = Some(engine);
        is_resumed
    }

    /// Loads the stored checkpoint and resumes it, or starts fresh when there is none usable.
    pub fn resume_or_start(&mut self, config: GameConfig) -> bool {
        let saved = match self.store.load_snapshot() {
            Ok(saved) => saved,
            Err(err) => {
                log::warn!("Could not read saved game: {}", err);
                None
            }
        };
        self.start(config, saved)
    }

    /// Throws the current game away, deletes its checkpoint and starts over on a new board.
    pub fn reset(&mut self, config: GameConfig) {
        self.engine = None;
        if let Err(err) = self.store.clear_snapshot() {
            log::warn!("Could not clear saved game: {}", err);
        }
        self.start(config, None);
    }

    pub fn press_tile(&mut self, index: TileIndex) -> Result<PressOutcome> {
        let engine = self.engine.as_mut().ok_or(GameError::NotStarted)?;
        let outcome = engine.press_tile(index)?;

        match outcome {
            PressOutcome::NoChange => {}
            PressOutcome::Flipped(index) => {
                self.events.push(GameEvent::Flip(index));
                self.checkpoint();
            }
            PressOutcome::Matched(pair) => {
                self.events.push(GameEvent::Flip(index));
                self.events.push(GameEvent::Match(pair));
                self.checkpoint();
            }
            PressOutcome::Mismatched(pair) => {
                self.events.push(GameEvent::Flip(index));
                self.events.push(GameEvent::Mismatch(pair));
                self.checkpoint();
            }
            PressOutcome::Won(pair, summary) => {
                self.events.push(GameEvent::Flip(index));
                self.events.push(GameEvent::Match(pair));
                self.record_win(summary);
            }
        }
        Ok(outcome)
    }

    pub fn resolve_mismatch(&mut self) -> ResolveOutcome {
        let outcome = match self.engine.as_mut() {
            Some(engine) => engine.resolve_mismatch(),
            None => ResolveOutcome::NoChange,
        };
        if outcome.has_update() {
            self.checkpoint();
        }
        outcome
    }

    /// Like [`resolve_mismatch`](Self::resolve_mismatch), but a no-op unless `pair` is still the one on screen.
    pub fn resolve_mismatch_for(&mut self, pair: TilePair) -> ResolveOutcome {
        let outcome = match self.engine.as_mut() {
            Some(engine) => engine.resolve_mismatch_for(pair),
            None => ResolveOutcome::NoChange,
        };
        if outcome.has_update() {
            self.checkpoint();
        }
        outcome
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(engine) = self.engine.as_mut() else {
            return TickOutcome::Idle;
        };
        let outcome = engine.tick();
        if outcome == TickOutcome::Expired {
            self.events.push(GameEvent::TimeUp);
        }
        if self.dirty {
            self.write_checkpoint(false);
        }
        outcome
    }

    /// Pauses the clock and writes any pending checkpoint, for when the player leaves the screen.
    pub fn suspend(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause_timer();
        }
        self.flush();
    }

    /// Writes the pending checkpoint now, ignoring the cooldown.
    pub fn flush(&mut self) {
        if self.dirty {
            self.write_checkpoint(true);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    fn fresh_board(&mut self, grid: GridConfig) -> Board {
        match self.seed {
            Some(seed) => {
                self.seed = Some(seed.wrapping_add(1));
                RandomBoardGenerator::new(seed).generate(grid.pair_count())
            }
            None => generate_for(grid),
        }
    }

    fn checkpoint(&mut self) {
        self.dirty = true;
        self.write_checkpoint(false);
    }

    fn write_checkpoint(&mut self, force: bool) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        if engine.is_won() {
            self.dirty = false;
            return;
        }

        let now = self.clock.now();
        if force {
            self.gate.reset();
        }
        if !self.gate.try_begin(now) {
            log::trace!("Checkpoint dropped during cooldown");
            return;
        }

        match self.store.save_snapshot(&engine.snapshot()) {
            Ok(()) => {
                log::trace!("Checkpoint written at step {}", engine.step_count());
                self.dirty = false;
            }
            Err(err) => log::warn!("Could not write checkpoint: {}", err),
        }
        self.gate.complete(self.clock.now());
    }

    fn record_win(&mut self, summary: WinSummary) {
        let new_best = is_new_best(summary.score, self.best_score);
        if new_best {
            if let Err(err) = self.store.save_best_score(summary.score) {
                log::warn!("Could not save best score {}: {}", summary.score, err);
            }
            self.best_score = Some(summary.score);
        }
        if let Err(err) = self.store.clear_snapshot() {
            log::warn!("Could not clear saved game: {}", err);
        }
        self.dirty = false;
        log::info!(
            "Won {} in {} steps and {}s, score {}{}",
            summary.difficulty,
            summary.steps,
            summary.elapsed_seconds,
            summary.score,
            if new_best { " (new best)" } else { "" }
        );
        self.events.push(GameEvent::Won { summary, new_best });
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::time::Duration;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl TimeSource for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    /// Store that refuses every operation.
    struct BrokenStore;

    impl GameStore for BrokenStore {
        fn load_snapshot(&self) -> StorageResult<Option<SavedGame>> {
            Err(StorageError::Unavailable("offline".into()))
        }
        fn save_snapshot(&mut self, _: &SavedGame) -> StorageResult<()> {
            Err(StorageError::Unavailable("offline".into()))
        }
        fn clear_snapshot(&mut self) -> StorageResult<()> {
            Err(StorageError::Unavailable("offline".into()))
        }
        fn load_best_score(&self) -> StorageResult<Option<Score>> {
            Err(StorageError::Unavailable("offline".into()))
        }
        fn save_best_score(&mut self, _: Score) -> StorageResult<()> {
            Err(StorageError::Unavailable("offline".into()))
        }
    }

    type TestSession = GameSession<KeyValueGateway<MemoryStore>, ManualClock>;

    fn known_board() -> SavedGame {
        SavedGame {
            numbers: vec![1, 2, 1, 2],
            flipped: vec![false; 4],
            matched: vec![false; 4],
            steps: 0,
            time_left: 0,
            difficulty: Difficulty::Easy,
        }
    }

    fn session() -> (TestSession, ManualClock) {
        let clock = ManualClock::new();
        let mut session = GameSession::with_clock(KeyValueGateway::new(MemoryStore::new()), clock.clone());
        assert!(session.start(GameConfig::new(Difficulty::Easy), Some(known_board())));
        (session, clock)
    }

    fn saved(session: &TestSession) -> Option<SavedGame> {
        session.store().load_snapshot().unwrap()
    }

    #[test]
    fn idle_session_rejects_presses() {
        let mut session = GameSession::new(KeyValueGateway::new(MemoryStore::new()));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.press_tile(0), Err(GameError::NotStarted));
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.resolve_mismatch(), ResolveOutcome::NoChange);
    }

    #[test]
    fn presses_emit_events_and_checkpoint() {
        let (mut session, _) = session();
        session.press_tile(0).unwrap();
        assert_eq!(session.drain_events(), vec![GameEvent::Flip(0)]);
        assert_eq!(saved(&session).unwrap().flipped, vec![true, false, false, false]);

        session.press_tile(2).unwrap();
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Flip(2), GameEvent::Match(TilePair::new(0, 2))]
        );
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn cooldown_defers_checkpoint_until_tick() {
        let (mut session, clock) = session();
        session.press_tile(0).unwrap();
        session.press_tile(1).unwrap();

        // second write fell inside the cooldown
        assert!(session.has_unsaved_changes());
        assert_eq!(saved(&session).unwrap().steps, 1);

        clock.advance(CHECKPOINT_COOLDOWN);
        session.tick();
        assert!(!session.has_unsaved_changes());
        assert_eq!(saved(&session).unwrap().steps, 2);
    }

    #[test]
    fn flush_ignores_cooldown() {
        let (mut session, _) = session();
        session.press_tile(0).unwrap();
        session.press_tile(1).unwrap();
        session.suspend();
        assert!(!session.has_unsaved_changes());
        assert_eq!(saved(&session).unwrap().steps, 2);
        assert!(!session.engine().unwrap().timer().is_running());
    }

    #[test]
    fn win_records_best_and_clears_checkpoint() {
        let (mut session, _) = session();
        for index in [0, 2, 1] {
            session.press_tile(index).unwrap();
        }
        session.drain_events();
        let outcome = session.press_tile(3).unwrap();

        let PressOutcome::Won(pair, summary) = outcome else {
            panic!("expected win, got {:?}", outcome);
        };
        assert_eq!(pair, TilePair::new(1, 3));
        assert_eq!(summary.score, 960);
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(session.best_score(), Some(960));
        assert_eq!(session.store().load_best_score().unwrap(), Some(960));
        assert_eq!(saved(&session), None);
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::Flip(3),
                GameEvent::Match(TilePair::new(1, 3)),
                GameEvent::Won { summary, new_best: true },
            ]
        );
        assert_eq!(session.press_tile(0), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn worse_score_keeps_stored_best() {
        let mut store = MemoryStore::new();
        store.set(BEST_SCORE_KEY, "990").unwrap();
        let mut session = GameSession::new(KeyValueGateway::new(store));
        session.start(GameConfig::new(Difficulty::Easy), Some(known_board()));
        assert_eq!(session.best_score(), Some(990));

        for index in [0, 2, 1, 3] {
            session.press_tile(index).unwrap();
        }
        let events = session.drain_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::Won { new_best: false, .. })
        ));
        assert_eq!(session.store().load_best_score().unwrap(), Some(990));
    }

    #[test]
    fn reset_clears_progress_and_checkpoint() {
        let (mut session, _) = session();
        session.press_tile(0).unwrap();
        assert!(saved(&session).is_some());

        session.reset(GameConfig::new(Difficulty::Easy));
        let engine = session.engine().unwrap();
        assert_eq!(engine.step_count(), 0);
        assert!(engine.tiles().iter().all(|tile| tile.is_hidden()));
        assert_eq!(saved(&session), None);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn corrupt_resume_falls_back_to_fresh_board() {
        let mut snapshot = known_board();
        snapshot.matched[0] = true;
        let mut session = GameSession::new(KeyValueGateway::new(MemoryStore::new()));
        assert!(!session.start(GameConfig::new(Difficulty::Easy), Some(snapshot)));
        assert_eq!(session.engine().unwrap().step_count(), 0);
    }

    #[test]
    fn other_difficulty_is_not_resumed() {
        let mut gateway = KeyValueGateway::new(MemoryStore::new());
        gateway.save_snapshot(&known_board()).unwrap();
        let mut session = GameSession::new(gateway);
        assert!(!session.resume_or_start(GameConfig::new(Difficulty::Medium)));
        assert_eq!(session.engine().unwrap().board().len(), 16);
    }

    #[test]
    fn seeded_sessions_repeat_boards() {
        let config = GameConfig::new(Difficulty::Hard);
        let mut a = GameSession::new(KeyValueGateway::new(MemoryStore::new())).with_seed(7);
        let mut b = GameSession::new(KeyValueGateway::new(MemoryStore::new())).with_seed(7);
        a.start(config, None);
        b.start(config, None);
        assert_eq!(a.engine().unwrap().board(), b.engine().unwrap().board());
    }

    #[test]
    fn countdown_expiry_is_reported_once() {
        let mut session = GameSession::new(KeyValueGateway::new(MemoryStore::new()));
        session.start(GameConfig::new(Difficulty::SuperHard), None);
        session.press_tile(0).unwrap();
        session.drain_events();

        for _ in 0..COUNTDOWN_BUDGET + 5 {
            session.tick();
        }
        assert_eq!(session.drain_events(), vec![GameEvent::TimeUp]);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn broken_storage_never_blocks_play() {
        let mut session = GameSession::new(BrokenStore);
        assert!(!session.resume_or_start(GameConfig::new(Difficulty::Easy)));
        assert_eq!(session.best_score(), None);

        let board: Vec<TileValue> = session.engine().unwrap().board().values().to_vec();
        let partner = (1..4).find(|&i| board[i] == board[0]).unwrap() as TileIndex;
        session.press_tile(0).unwrap();
        assert!(session.has_unsaved_changes());
        session.press_tile(partner).unwrap();
        session.flush();
        assert!(session.has_unsaved_changes());

        let rest: Vec<TileIndex> = (1..4).filter(|&i| i != partner).collect();
        session.press_tile(rest[0]).unwrap();
        let outcome = session.press_tile(rest[1]).unwrap();
        let PressOutcome::Won(_, summary) = outcome else {
            panic!("expected win, got {:?}", outcome);
        };
        assert_eq!(session.best_score(), Some(summary.score));
        session.reset(GameConfig::new(Difficulty::Easy));
        assert_eq!(session.state(), SessionState::Running);
    }
}
