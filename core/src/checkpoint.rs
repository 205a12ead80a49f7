use core::time::Duration;
use web_time::Instant;

/// Admits at most one checkpoint write at a time, then drops requests until the cooldown passes.
#[derive(Clone, Debug)]
pub struct CheckpointGate {
    cooldown: Duration,
    in_flight: bool,
    quiet_until: Option<Instant>,
}

impl CheckpointGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            in_flight: false,
            quiet_until: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        !self.in_flight && self.quiet_until.is_none_or(|until| now >= until)
    }

    /// Claims the write slot, `false` means the request is dropped.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Releases the slot and starts the cooldown.
    pub fn complete(&mut self, now: Instant) {
        self.in_flight = false;
        self.quiet_until = Some(now + self.cooldown);
    }

    /// Clears the cooldown, e.g. when a new game begins.
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.quiet_until = None;
    }
}

impl Default for CheckpointGate {
    fn default() -> Self {
        Self::new(crate::CHECKPOINT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_write_in_flight() {
        let now = Instant::now();
        let mut gate = CheckpointGate::new(Duration::from_millis(300));
        assert!(gate.try_begin(now));
        assert!(gate.is_in_flight());
        assert!(!gate.try_begin(now));
    }

    #[test]
    fn cooldown_drops_requests() {
        let start = Instant::now();
        let mut gate = CheckpointGate::new(Duration::from_millis(300));
        assert!(gate.try_begin(start));
        gate.complete(start);

        assert!(!gate.try_begin(start + Duration::from_millis(100)));
        assert!(!gate.try_begin(start + Duration::from_millis(299)));
        assert!(gate.try_begin(start + Duration::from_millis(300)));
    }

    #[test]
    fn reset_reopens_immediately() {
        let start = Instant::now();
        let mut gate = CheckpointGate::default();
        gate.try_begin(start);
        gate.complete(start);
        gate.reset();
        assert!(gate.is_ready(start));
    }
}
