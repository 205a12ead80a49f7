use core::time::Duration;

pub use board::*;
pub use checkpoint::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use gateway::*;
pub use generator::*;
pub use score::*;
pub use session::*;
pub use snapshot::*;
pub use store::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod board;
mod checkpoint;
mod config;
mod engine;
mod error;
mod events;
mod gateway;
mod generator;
mod score;
mod session;
mod snapshot;
mod store;
mod tile;
mod timer;
mod types;

/// Cadence at which the presentation layer calls `tick`.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long a mismatched pair stays visible before `resolve_mismatch`.
pub const MISMATCH_REVEAL_DELAY: Duration = Duration::from_millis(800);

/// Quiet period after a checkpoint write during which new checkpoints are dropped.
pub const CHECKPOINT_COOLDOWN: Duration = Duration::from_millis(300);

/// Delay between the final match and leaving the board for the win screen.
pub const WIN_CELEBRATION_DELAY: Duration = Duration::from_secs(5);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    NoChange,
    Flipped(TileIndex),
    Matched(TilePair),
    Mismatched(TilePair),
    Won(TilePair, WinSummary),
}

impl PressOutcome {
    pub const fn has_update(self) -> bool {
        use PressOutcome::*;
        match self {
            NoChange => false,
            Flipped(_) => true,
            Matched(_) => true,
            Mismatched(_) => true,
            Won(..) => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    NoChange,
    Resolved(TilePair),
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Resolved(_) => true,
        }
    }
}
