//! Anti-cheat constants, reach checks, and the rapid-action rate limiter.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum per-axis distance (voxels) between a builder and the endpoints
/// of the line they are building.
pub const MAX_BUILD_DISTANCE: f32 = 6.0;

/// Extra cells a line may cover beyond the builder's remaining allowance
/// before the whole line is rejected.
pub const BUILD_TOLERANCE: u32 = 5;

/// Default number of events the rapid-hack window remembers.
pub const RAPID_WINDOW_ENTRIES: usize = 10;

/// Default span of the rapid-hack window.
pub const RAPID_WINDOW: Duration = Duration::from_secs(1);

/// Per-axis proximity check: every axis differs by less than `distance`.
pub fn within_reach(a: (f32, f32, f32), b: (f32, f32, f32), distance: f32) -> bool {
    (a.0 - b.0).abs() < distance && (a.1 - b.1).abs() < distance && (a.2 - b.2).abs() < distance
}

/// Trailing-window event counter.
///
/// Keeps the timestamps of the last `entries` events. The limiter is above
/// its limit once the window is full and the oldest remembered event is
/// younger than `window`, i.e. more than `entries - 1` further events
/// arrived within `window` of it.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    events: VecDeque<Instant>,
    entries: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(entries: usize, window: Duration) -> Self {
        let entries = entries.max(1);
        Self {
            events: VecDeque::with_capacity(entries),
            entries,
            window,
        }
    }

    /// Remember an event, evicting the oldest once the window is full.
    pub fn record_event(&mut self, at: Instant) {
        if self.events.len() == self.entries {
            self.events.pop_front();
        }
        self.events.push_back(at);
    }

    /// Whether the remembered events are packed tighter than the window allows.
    pub fn above_limit(&self) -> bool {
        if self.events.len() < self.entries {
            return false;
        }
        match (self.events.front(), self.events.back()) {
            (Some(oldest), Some(newest)) => newest.saturating_duration_since(*oldest) < self.window,
            _ => false,
        }
    }

    /// Number of remembered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RAPID_WINDOW_ENTRIES, RAPID_WINDOW)
    }
}
