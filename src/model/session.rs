use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::{Difficulty, Sequence, TimerState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Setup,
    Idle,
    Countdown,
    Playing,
    Finished,
}

impl SessionStatus {
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Countdown | SessionStatus::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Counting { remaining: u32 },
    Started,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    Advanced { next_expected: u32 },
    Rejected { expected: u32 },
    Completed { elapsed: Duration },
}

/// One attempt, from countdown to the last tile. Every transition goes through
/// `tick` or `tap`; a rejected tap leaves the session untouched.
#[derive(Debug, Clone)]
pub struct Session {
    difficulty: Difficulty,
    sequence: Sequence,
    status: SessionStatus,
    countdown: u32,
    next_expected: u32,
    timer: Option<TimerState>,
}

impl Session {
    pub fn new(difficulty: Difficulty, sequence: Sequence, countdown_ticks: u32) -> Self {
        Self {
            difficulty,
            sequence,
            status: SessionStatus::Countdown,
            countdown: countdown_ticks,
            next_expected: 1,
            timer: None,
        }
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn next_expected(&self) -> u32 {
        self.next_expected
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.timer
            .map(|timer| timer.elapsed(now))
            .unwrap_or_default()
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.status != SessionStatus::Countdown {
            return TickOutcome::Ignored;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return TickOutcome::Counting {
                remaining: self.countdown,
            };
        }
        self.status = SessionStatus::Playing;
        self.timer = Some(TimerState::started(now));
        TickOutcome::Started
    }

    pub fn tap(&mut self, value: u32, now: Instant) -> TapOutcome {
        if self.status != SessionStatus::Playing {
            return TapOutcome::Ignored;
        }
        if value != self.next_expected {
            return TapOutcome::Rejected {
                expected: self.next_expected,
            };
        }
        if value >= self.difficulty.total {
            let timer = self
                .timer
                .unwrap_or_else(|| TimerState::started(now))
                .ended(now);
            self.timer = Some(timer);
            self.status = SessionStatus::Finished;
            return TapOutcome::Completed {
                elapsed: timer.elapsed(now),
            };
        }
        self.next_expected = value + 1;
        TapOutcome::Advanced {
            next_expected: self.next_expected,
        }
    }
}
