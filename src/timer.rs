//! Cancellable timer tokens
//!
//! Timers run on background threads and come back as `Msg::Timer(Fired)`.
//! A sleeping thread cannot be recalled, so cancellation is done with a
//! generation counter: every schedule or cancel bumps it, and only the token
//! from the latest generation is honoured when it fires.

use crate::model::GridId;

/// Identifies what a timer is for, so a fired timer can be routed back
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Server did not answer a grid fetch in time
    FetchTimeout(GridId),
    /// Scrollbar has been quiet long enough to report idle
    ScrollIdle(GridId),
}

/// Token handed out by [`TimerSlot::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// One logical timer. Scheduling again implicitly cancels the previous token.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    generation: u64,
    armed: bool,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, invalidating any previously issued token
    pub fn schedule(&mut self) -> TimerToken {
        self.generation += 1;
        self.armed = true;
        TimerToken(self.generation)
    }

    /// Disarm the timer; any outstanding token becomes stale
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    /// Consume a fired token. Returns true only for the current, armed token.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.armed && token.0 == self.generation {
            self.armed = false;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
