use serde::{Deserialize, Serialize};

use crate::*;

pub const BASE_SCORE: Score = 1000;
pub const STEP_PENALTY: Score = 10;
pub const SECOND_PENALTY: Score = 5;

/// `max(0, 1000 - (steps * 10 + seconds * 5))`
pub const fn compute_score(steps: StepCount, elapsed: Seconds) -> Score {
    let penalty = steps
        .saturating_mul(STEP_PENALTY)
        .saturating_add(elapsed.saturating_mul(SECOND_PENALTY));
    BASE_SCORE.saturating_sub(penalty)
}

/// Whether `score` should replace the stored best.
pub const fn is_new_best(score: Score, stored: Option<Score>) -> bool {
    match stored {
        None => true,
        Some(best) => score > best,
    }
}

/// Final result reported when the last pair is matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinSummary {
    pub score: Score,
    pub steps: StepCount,
    pub elapsed_seconds: Seconds,
    pub difficulty: Difficulty,
}

impl WinSummary {
    pub const fn new(steps: StepCount, elapsed_seconds: Seconds, difficulty: Difficulty) -> Self {
        Self {
            score: compute_score(steps, elapsed_seconds),
            steps,
            elapsed_seconds,
            difficulty,
        }
    }
}
