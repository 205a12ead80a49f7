use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running, nothing counted.
    Idle,
    /// Clock moved, carries the new displayed value.
    Advanced(Seconds),
    /// Count-down just reached zero.
    Expired,
}

/// Game clock driven by external one-second ticks.
///
/// `value` is elapsed seconds when counting up and remaining seconds when counting down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    mode: TimerMode,
    value: Seconds,
    running: bool,
}

impl GameTimer {
    pub const fn new(mode: TimerMode) -> Self {
        Self::with_value(mode, mode.initial_value())
    }

    pub const fn with_value(mode: TimerMode, value: Seconds) -> Self {
        Self {
            mode,
            value,
            running: false,
        }
    }

    pub const fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Seconds as displayed, persisted as `timeLeft`.
    pub const fn value(&self) -> Seconds {
        self.value
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> Seconds {
        match self.mode {
            TimerMode::CountUp => self.value,
            TimerMode::CountDown { budget } => budget.saturating_sub(self.value),
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        match self.mode {
            TimerMode::CountUp => {
                self.value = self.value.saturating_add(1);
                TickOutcome::Advanced(self.value)
            }
            TimerMode::CountDown { .. } if self.value == 0 => TickOutcome::Idle,
            TimerMode::CountDown { .. } => {
                self.value -= 1;
                if self.value == 0 {
                    TickOutcome::Expired
                } else {
                    TickOutcome::Advanced(self.value)
                }
            }
        }
    }
}
