//! Tick scheduling state.
//!
//! `FrameScheduler` is a pure Stopped/Running state machine: it owns the
//! target rate and the running flag, nothing else. The host-side driver
//! (an animation-frame or timeout callback chain in the browser, a plain
//! loop in tests) re-checks `is_running()` at the top of every callback and
//! before each reschedule, which is what makes `stop()` logically final:
//! callbacks already in flight degrade to no-ops instead of being
//! cancelled.

use crate::error::GraphError;

/// Validated tick rate in ticks per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate {
    per_second: f64,
}

impl FrameRate {
    /// Create a rate, rejecting values that would break per-tick step
    /// derivation (zero divides, negatives and non-finites poison it).
    pub fn new(per_second: f64) -> Result<Self, GraphError> {
        if !per_second.is_finite() || per_second <= 0.0 {
            return Err(GraphError::InvalidFrameRate { value: per_second });
        }
        Ok(Self { per_second })
    }

    /// Ticks per second.
    #[inline]
    pub fn per_second(self) -> f64 {
        self.per_second
    }

    /// Target interval between ticks in milliseconds.
    #[inline]
    pub fn interval_ms(self) -> f64 {
        1000.0 / self.per_second
    }
}

impl Default for FrameRate {
    /// 30 ticks per second.
    fn default() -> Self {
        Self { per_second: 30.0 }
    }
}

/// Stopped/Running lifecycle for the tick stream.
#[derive(Debug, Clone, Copy)]
pub struct FrameScheduler {
    rate: FrameRate,
    running: bool,
}

impl FrameScheduler {
    /// Create a stopped scheduler.
    pub fn new(rate: FrameRate) -> Self {
        Self {
            rate,
            running: false,
        }
    }

    /// Transition to Running.
    ///
    /// Idempotent: returns true only when this call performed the
    /// transition, so a driver can arm its callback chain exactly once.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Transition to Stopped. Returns true if the scheduler was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    /// Whether ticks should keep flowing.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The configured tick rate.
    #[inline]
    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Replace the tick rate; takes effect at the next reschedule.
    pub fn set_rate(&mut self, rate: FrameRate) {
        self.rate = rate;
    }

    /// Target interval between ticks in milliseconds.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.rate.interval_ms()
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FrameRate::default())
    }
}
