//! Frame pacing helpers: per-frame delta and a once-a-second FPS counter.

use std::time::{Duration, Instant};

/// Longest step fed to the animation; keeps the model from jumping after a
/// stall (window drag, breakpoint).
const MAX_DT: f32 = 0.1;

/// Monotonic frame clock.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous tick. The first tick returns 0.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(MAX_DT)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts frames and reports the rate once per `window`.
#[derive(Debug)]
pub struct FpsCounter {
    window: Duration,
    started: Option<Instant>,
    frames: u32,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            started: None,
            frames: 0,
        }
    }

    /// Record one frame; returns frames/second when a window completes.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        let started = *self.started.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.window {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.started = Some(now);
        self.frames = 0;
        Some(fps)
    }
}
