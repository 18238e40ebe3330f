/// Counts checks that passed without a heartbeat
#[derive(Debug, Clone)]
pub struct HeartbeatMonitor {
    max_missed: u32,
    missed: u32,
    seen_since_check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatStatus {
    Alive,
    Missed(u32),
    /// `max_missed` consecutive checks failed; reconnect
    Stale,
}

impl HeartbeatMonitor {
    pub fn new(max_missed: u32) -> Self {
        Self {
            max_missed: max_missed.max(1),
            missed: 0,
            seen_since_check: false,
        }
    }

    pub fn record_heartbeat(&mut self) {
        self.seen_since_check = true;
    }

    pub fn check(&mut self) -> HeartbeatStatus {
        if std::mem::take(&mut self.seen_since_check) {
            self.missed = 0;
            return HeartbeatStatus::Alive;
        }

        self.missed += 1;
        if self.missed >= self.max_missed {
            HeartbeatStatus::Stale
        } else {
            HeartbeatStatus::Missed(self.missed)
        }
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn reset(&mut self) {
        self.missed = 0;
        self.seen_since_check = false;
    }
}
