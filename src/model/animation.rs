//! Scroll animation of a grid model.

use std::time::{Duration, Instant};

/// Sawtooth scroll plus a stepping noise offset.
///
/// Within one interval the grid slides forward by up to one tile; when the
/// interval elapses the grid snaps back and the noise texture advances by one
/// row instead, so the terrain appears to move continuously.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    noise_offset: f32,
    start: Instant,
    interval: Duration,
    /// Noise offset increment (`tile_size / rows`)
    step: f32,
    tile_size: f32,
}

impl AnimationState {
    pub fn new(start: Instant, interval: Duration, rows: u32, tile_size: f32) -> Self {
        Self {
            noise_offset: 0.0,
            start,
            interval,
            step: (1.0 / rows as f32) * tile_size,
            tile_size,
        }
    }

    pub fn noise_offset(&self) -> f32 {
        self.noise_offset
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Advance to `now` and return the current vertex offset.
    ///
    /// Times earlier than the interval start count as no elapsed time.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let mut elapsed = now.saturating_duration_since(self.start);

        if elapsed > self.interval {
            self.start = now;
            elapsed = Duration::ZERO;
            self.noise_offset += self.step;
        }

        if self.interval.is_zero() {
            return 0.0;
        }
        (elapsed.as_secs_f32() / self.interval.as_secs_f32()) * self.tile_size
    }
}
