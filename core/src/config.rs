use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Largest supported grid side.
pub const MAX_SIDE: Side = 16;

/// Seconds on the clock at the start of a count-down game.
pub const COUNTDOWN_BUDGET: Seconds = 100;

/// The preset tiers offered by the difficulty screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "easy2", alias = "easy")]
    Easy,
    #[serde(rename = "medium4", alias = "medium")]
    Medium,
    #[serde(rename = "hard6", alias = "hard")]
    Hard,
    #[serde(rename = "superhard")]
    SuperHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::SuperHard];

    pub const fn side(self) -> Side {
        use Difficulty::*;
        match self {
            Easy => 2,
            Medium => 4,
            Hard => 6,
            SuperHard => 9,
        }
    }

    pub const fn timer_mode(self) -> TimerMode {
        match self {
            Self::SuperHard => TimerMode::CountDown {
                budget: COUNTDOWN_BUDGET,
            },
            _ => TimerMode::CountUp,
        }
    }

    /// Tag written into saved games and accepted on the command line.
    pub const fn tag(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy2",
            Medium => "medium4",
            Hard => "hard6",
            SuperHard => "superhard",
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
            SuperHard => "Super Hard",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        use Difficulty::*;
        match tag.trim().to_ascii_lowercase().as_str() {
            "easy2" | "easy" => Some(Easy),
            "medium4" | "medium" => Some(Medium),
            "hard6" | "hard" => Some(Hard),
            "superhard" => Some(SuperHard),
            _ => None,
        }
    }

    pub fn grid(self) -> GridConfig {
        GridConfig::new_unchecked(self.side())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    CountUp,
    CountDown { budget: Seconds },
}

impl TimerMode {
    /// Clock value shown before the first press.
    pub const fn initial_value(self) -> Seconds {
        match self {
            Self::CountUp => 0,
            Self::CountDown { budget } => budget,
        }
    }
}

/// Square grid dimensions. An odd cell count leaves one decorative filler cell that is not part of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    side: Side,
}

impl GridConfig {
    pub(crate) const fn new_unchecked(side: Side) -> Self {
        Self { side }
    }

    pub fn new(side: Side) -> Result<Self> {
        if (1..=MAX_SIDE).contains(&side) {
            Ok(Self::new_unchecked(side))
        } else {
            Err(GameError::InvalidGridSize(side))
        }
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    pub const fn cell_count(&self) -> CellCount {
        square(self.side)
    }

    pub const fn pair_count(&self) -> CellCount {
        self.cell_count() / 2
    }

    /// Number of tiles on the board, always even.
    pub const fn board_len(&self) -> CellCount {
        self.pair_count() * 2
    }

    pub const fn filler_cells(&self) -> CellCount {
        self.cell_count() - self.board_len()
    }

    /// Maps a grid cell in row-major order to its tile, `None` for the filler cell.
    pub const fn tile_at_cell(&self, cell: CellCount) -> Option<TileIndex> {
        if cell < self.board_len() {
            Some(cell)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub grid: GridConfig,
    pub timer: TimerMode,
}

impl GameConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            grid: difficulty.grid(),
            timer: difficulty.timer_mode(),
        }
    }

    pub fn with_grid(self, grid: GridConfig) -> Self {
        Self { grid, ..self }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::new(difficulty)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
