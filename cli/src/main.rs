use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use tileflip_core::*;

mod file_store;
mod render;

use file_store::FileStore;

#[derive(Parser, Debug)]
#[command(version, about = "Flip tiles and find every pair", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Difficulty tag: easy2, medium4, hard6 or superhard
    #[arg(short, long, default_value = "easy2")]
    difficulty: Difficulty,

    /// Where the saved game and best score live
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Discard any saved game and start a new one
    #[arg(short, long)]
    new: bool,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

enum Input {
    Line(String),
    Closed,
}

enum Command {
    Press(CellCount),
    Reset,
    Quit,
    Best,
    Show,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Some(Command::Show),
        "r" | "reset" => Some(Command::Reset),
        "q" | "quit" => Some(Command::Quit),
        "best" => Some(Command::Best),
        other => other
            .parse::<CellCount>()
            .ok()
            .filter(|&cell| cell >= 1)
            .map(|cell| Command::Press(cell - 1)),
    }
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let Some(home) = std::env::var_os("HOME") else {
        bail!("HOME is not set, pass --data-dir");
    };
    Ok(PathBuf::from(home).join(".local/share/tileflip"))
}

fn spawn_stdin_reader() -> Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
    rx
}

/// Deadlines owned by the front-end, the engine itself never waits.
struct Schedule {
    next_tick: Instant,
    reveal: Option<(Instant, TilePair)>,
    celebration: Option<(Instant, WinSummary)>,
}

impl Schedule {
    fn new(now: Instant) -> Self {
        Self {
            next_tick: now + TICK_INTERVAL,
            reveal: None,
            celebration: None,
        }
    }

    fn nearest(&self) -> Instant {
        [
            Some(self.next_tick),
            self.reveal.map(|(at, _)| at),
            self.celebration.map(|(at, _)| at),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(self.next_tick)
    }
}

struct App {
    session: GameSession<KeyValueGateway<FileStore>>,
    config: GameConfig,
    schedule: Schedule,
}

impl App {
    fn new(session: GameSession<KeyValueGateway<FileStore>>, config: GameConfig) -> Self {
        let now = Instant::now();
        let mut app = Self {
            session,
            config,
            schedule: Schedule::new(now),
        };
        app.arm_pending_reveal(now);
        app
    }

    /// Schedules the flip-back for a mismatch the engine already holds, such as one restored from a checkpoint.
    fn arm_pending_reveal(&mut self, now: Instant) {
        self.schedule.reveal = self
            .session
            .engine()
            .and_then(PlayEngine::pending_mismatch)
            .map(|pair| (now + MISMATCH_REVEAL_DELAY, pair));
    }

    fn show(&self) {
        if let Some(engine) = self.session.engine() {
            println!("{}", render::status(engine, self.session.best_score()));
            print!("{}", render::board(engine));
        }
    }

    fn print_cues(&mut self) {
        for event in self.session.drain_events() {
            if let Some(cue) = render::cue(&event) {
                println!("{}", cue);
            }
        }
    }

    fn press(&mut self, cell: CellCount) {
        if self.schedule.celebration.is_some() {
            log::debug!("Ignoring input during win celebration");
            return;
        }
        if self.session.state() == SessionState::Won {
            println!("Game over, r to play again");
            return;
        }
        let Some(index) = self.config.grid.tile_at_cell(cell) else {
            println!("No tile at {}", cell + 1);
            return;
        };

        match self.session.press_tile(index) {
            Ok(PressOutcome::NoChange) => println!("Tile {} cannot be flipped now", cell + 1),
            Ok(PressOutcome::Mismatched(pair)) => {
                self.schedule.reveal = Some((Instant::now() + MISMATCH_REVEAL_DELAY, pair));
            }
            Ok(PressOutcome::Won(_, summary)) => {
                self.schedule.celebration = Some((Instant::now() + WIN_CELEBRATION_DELAY, summary));
            }
            Ok(_) => {}
            Err(err) => println!("{}", err),
        }
        self.print_cues();
        self.show();
    }

    fn reset(&mut self) {
        self.schedule.reveal = None;
        self.schedule.celebration = None;
        self.session.reset(self.config);
        self.arm_pending_reveal(Instant::now());
        println!("New {} game", self.config.difficulty.name());
        self.show();
    }

    /// Fires whatever deadlines have passed.
    fn on_timeout(&mut self, now: Instant) {
        if let Some((at, pair)) = self.schedule.reveal
            && now >= at
        {
            self.schedule.reveal = None;
            if self.session.resolve_mismatch_for(pair).has_update() {
                self.show();
            }
        }

        while now >= self.schedule.next_tick {
            self.session.tick();
            self.schedule.next_tick += TICK_INTERVAL;
        }
        self.print_cues();

        if let Some((at, summary)) = self.schedule.celebration
            && now >= at
        {
            self.schedule.celebration = None;
            println!("{}", render::win_screen(&summary, self.session.best_score()));
        }
    }

    fn run(&mut self, input: Receiver<Input>) {
        loop {
            let timeout = self.schedule.nearest().saturating_duration_since(Instant::now());
            match input.recv_timeout(timeout) {
                Ok(Input::Line(line)) => match parse_command(&line) {
                    Some(Command::Press(cell)) => self.press(cell),
                    Some(Command::Reset) => self.reset(),
                    Some(Command::Quit) => break,
                    Some(Command::Best) => match self.session.best_score() {
                        Some(best) => println!("Best score: {}", best),
                        None => println!("No best score yet"),
                    },
                    Some(Command::Show) => self.show(),
                    None => println!("Type a tile number, r to reset or q to quit"),
                },
                Ok(Input::Closed) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.on_timeout(Instant::now());
        }
        self.session.suspend();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("seed: {:?}", args.seed);

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Could not create data directory {}", data_dir.display()))?;
    log::info!("Using data directory {}", data_dir.display());

    let config = GameConfig::new(args.difficulty);
    let mut session = GameSession::new(KeyValueGateway::new(FileStore::new(data_dir)));
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    if args.new {
        session.reset(config);
    } else if session.resume_or_start(config) {
        println!("Resuming saved {} game", config.difficulty.name());
    }

    let mut app = App::new(session, config);
    println!("Type a tile number to flip it, r to reset, q to quit");
    app.show();
    app.run(spawn_stdin_reader());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert!(matches!(parse_command(" 3 "), Some(Command::Press(2))));
        assert!(matches!(parse_command("R"), Some(Command::Reset)));
        assert!(matches!(parse_command("quit"), Some(Command::Quit)));
        assert!(matches!(parse_command(""), Some(Command::Show)));
        assert!(parse_command("0").is_none());
        assert!(parse_command("flip").is_none());
    }

    #[test]
    fn args_accept_legacy_tags() {
        let args = Args::try_parse_from(["tileflip", "--difficulty", "hard", "--seed", "9"]).unwrap();
        assert_eq!(args.difficulty, Difficulty::Hard);
        assert_eq!(args.seed, Some(9));
        assert!(Args::try_parse_from(["tileflip", "-d", "impossible"]).is_err());
    }

    #[test]
    fn resumed_mismatch_is_flipped_back() {
        let dir = std::env::temp_dir().join(format!("tileflip-resume-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let saved = SavedGame {
            numbers: vec![2, 1, 1, 2],
            flipped: vec![true, true, false, false],
            matched: vec![false; 4],
            steps: 2,
            time_left: 0,
            difficulty: Difficulty::Easy,
        };
        KeyValueGateway::new(FileStore::new(&dir)).save_snapshot(&saved).unwrap();

        let config = GameConfig::new(Difficulty::Easy);
        let mut session = GameSession::new(KeyValueGateway::new(FileStore::new(&dir)));
        assert!(session.resume_or_start(config));
        let mut app = App::new(session, config);

        let pair = TilePair::new(0, 1);
        let (at, armed) = app.schedule.reveal.unwrap();
        assert_eq!(armed, pair);

        app.on_timeout(at);
        assert!(app.schedule.reveal.is_none());
        let engine = app.session.engine().unwrap();
        assert!(engine.open_selection().is_empty());
        assert!(engine.tiles().iter().all(|tile| tile.is_hidden()));

        app.press(2);
        assert_eq!(app.session.engine().unwrap().step_count(), 3);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn fresh_game_has_nothing_to_reveal() {
        let dir = std::env::temp_dir().join(format!("tileflip-fresh-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let config = GameConfig::new(Difficulty::Medium);
        let mut session = GameSession::new(KeyValueGateway::new(FileStore::new(&dir)));
        session.reset(config);
        let app = App::new(session, config);
        assert!(app.schedule.reveal.is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn nearest_deadline_wins() {
        let now = Instant::now();
        let mut schedule = Schedule::new(now);
        assert_eq!(schedule.nearest(), now + TICK_INTERVAL);
        schedule.reveal = Some((now + MISMATCH_REVEAL_DELAY, TilePair::new(0, 1)));
        assert_eq!(schedule.nearest(), now + MISMATCH_REVEAL_DELAY);
    }
}
