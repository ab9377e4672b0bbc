//! Trace escalation: time-driven decay of drawn path segments.
//!
//! Once the player traverses their first data node the trace activates.
//! From then on, every full `interval` of injected time consumes one drawn
//! path segment; consuming the last one while the session is still live is
//! a loss. The core tracks only the segment count and the accumulator --
//! which visual segment decays, and in what color, is presentation work.
//!
//! Time is pushed in from outside via the session's `advance_trace`; the
//! core never reads a clock.

use crate::config::Ticks;
use serde::{Deserialize, Serialize};

/// Result of advancing the trace clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceTick {
    /// Trace inactive, or not enough time elapsed to decay anything.
    Idle,
    /// Some segments decayed during this advance; at least one remains.
    Decayed { consumed: u32, remaining: u32 },
    /// The last drawn segment was consumed.
    Exhausted,
}

/// Trace clock and segment pool for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceState {
    active: bool,
    interval: Ticks,
    elapsed: Ticks,
    segments: u32,
}

impl TraceState {
    /// Inactive trace with the given decay interval.
    pub fn new(interval: Ticks) -> Self {
        Self {
            active: false,
            interval,
            elapsed: 0,
            segments: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn interval(&self) -> Ticks {
        self.interval
    }

    /// Drawn segments the trace has not consumed yet.
    pub fn segments_remaining(&self) -> u32 {
        self.segments
    }

    /// Start the escalation. Called on the first data-node traversal; the
    /// accumulator starts from zero so the first decay is a full interval out.
    pub fn activate(&mut self) {
        self.active = true;
        self.elapsed = 0;
    }

    /// Credit one drawn path segment. Segments accumulate whether or not
    /// the trace is active; decay only consumes them while active.
    pub fn add_segment(&mut self) {
        self.segments += 1;
    }

    /// Advance the clock by `dt` ticks and consume segments for every full
    /// interval elapsed.
    pub fn advance(&mut self, dt: Ticks) -> TraceTick {
        if !self.active || self.segments == 0 {
            return TraceTick::Idle;
        }

        self.elapsed += dt;
        let mut consumed = 0;
        while self.elapsed >= self.interval && self.segments > 0 {
            self.elapsed -= self.interval;
            self.segments -= 1;
            consumed += 1;
        }

        if consumed == 0 {
            TraceTick::Idle
        } else if self.segments == 0 {
            TraceTick::Exhausted
        } else {
            TraceTick::Decayed {
                consumed,
                remaining: self.segments,
            }
        }
    }

    /// Back to the inactive starting state (new session).
    pub fn reset(&mut self) {
        self.active = false;
        self.elapsed = 0;
        self.segments = 0;
    }
}
