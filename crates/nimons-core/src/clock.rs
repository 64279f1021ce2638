//! Pausable countdown.
//!
//! Elapsed time excludes every paused interval, so resuming continues exactly
//! where the clock stopped. Time comes from a [`TimeSource`] so tests can
//! drive it by hand.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic millisecond clock.
pub trait TimeSource: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven time. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Fixed-duration countdown that can be paused.
pub struct GameClock {
    source: Arc<dyn TimeSource>,
    duration_ms: u64,
    started_at: Option<u64>,
    paused_at: Option<u64>,
    paused_total: u64,
}

impl fmt::Debug for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameClock")
            .field("duration_ms", &self.duration_ms)
            .field("started_at", &self.started_at)
            .field("paused_at", &self.paused_at)
            .field("paused_total", &self.paused_total)
            .finish()
    }
}

impl GameClock {
    pub fn new(source: Arc<dyn TimeSource>, duration_ms: u64) -> Self {
        Self {
            source,
            duration_ms,
            started_at: None,
            paused_at: None,
            paused_total: 0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.source.now_ms()
    }

    /// Start (or restart) from zero.
    pub fn start(&mut self) {
        self.started_at = Some(self.source.now_ms());
        self.paused_at = None;
        self.paused_total = 0;
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// No-op when not running.
    pub fn pause(&mut self) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(self.source.now_ms());
        }
    }

    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += self.source.now_ms().saturating_sub(paused_at);
        }
    }

    /// Running time so far, excluding paused intervals. Capped at the duration.
    pub fn elapsed_ms(&self) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let now = self.paused_at.unwrap_or_else(|| self.source.now_ms());
        now.saturating_sub(started_at)
            .saturating_sub(self.paused_total)
            .min(self.duration_ms)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms - self.elapsed_ms()
    }

    pub fn is_over(&self) -> bool {
        self.started_at.is_some() && self.elapsed_ms() >= self.duration_ms
    }
}
