//! Per-side countdown clocks driven by one-second ticks.

use tracing::info;

use crate::types::Side;

/// Identity of a tick source. Every `start`/`reset`/`stop` opens a new epoch
/// and ticks stamped with an older one are ignored, so at most one source is
/// ever effective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockEpoch(u64);

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Stale epoch or stopped clock.
    Ignored,
    Counted { side: Side, remaining: u32 },
    /// `side` just reached zero. The clock is stopped for good.
    Expired { side: Side },
}

#[derive(Debug, Clone)]
pub struct ClockManager {
    allotment: u32,
    human: u32,
    engine: u32,
    active: Side,
    running: bool,
    epoch: u64,
}

impl ClockManager {
    /// Both sides get `allotment` seconds.
    pub fn new(allotment: u32) -> Self {
        Self {
            allotment,
            human: allotment,
            engine: allotment,
            active: Side::Human,
            running: false,
            epoch: 0,
        }
    }

    pub fn remaining(&self, side: Side) -> u32 {
        match side {
            Side::Human => self.human,
            Side::Engine => self.engine,
        }
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_flagged(&self) -> bool {
        self.human == 0 || self.engine == 0
    }

    /// The epoch ticks must carry, while running.
    pub fn epoch(&self) -> Option<ClockEpoch> {
        self.running.then_some(ClockEpoch(self.epoch))
    }

    /// Begin counting down for `active`. A flagged clock stays stopped until
    /// [`reset`](Self::reset).
    pub fn start(&mut self, active: Side) -> ClockEpoch {
        self.epoch += 1;
        self.active = active;
        self.running = !self.is_flagged();
        ClockEpoch(self.epoch)
    }

    pub fn tick(&mut self, epoch: ClockEpoch) -> Tick {
        if !self.running || epoch != ClockEpoch(self.epoch) {
            return Tick::Ignored;
        }
        let side = self.active;
        let remaining = match side {
            Side::Human => &mut self.human,
            Side::Engine => &mut self.engine,
        };
        *remaining = remaining.saturating_sub(1);

        if *remaining == 0 {
            self.running = false;
            info!(?side, "clock expired");
            Tick::Expired { side }
        } else {
            Tick::Counted {
                side,
                remaining: *remaining,
            }
        }
    }

    /// Hand the countdown to `side`. No effect once stopped.
    pub fn switch_active(&mut self, side: Side) {
        if self.running {
            self.active = side;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.epoch += 1;
        }
    }

    /// Refill both sides and start counting for `active`.
    pub fn reset(&mut self, active: Side) -> ClockEpoch {
        self.human = self.allotment;
        self.engine = self.allotment;
        self.start(active)
    }
}

/// `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
