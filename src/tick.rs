//! Frame pacing and timing statistics.

use std::time::{Duration, Instant};

use crate::color::Rgb;
use crate::raster::FrameBuffer;

/// Longest step handed to the simulation, however long the frame gap was.
pub const MAX_STEP: Duration = Duration::from_millis(250);

/// Accepted frame rate range.
pub const MIN_FPS: f32 = 0.1;
pub const MAX_FPS: f32 = 1000.0;

/// Fixed-rate ticker. Ticks that were missed while a frame was still
/// being produced are merged into the next one.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// `fps` is clamped into `MIN_FPS..=MAX_FPS`; NaN counts as the minimum.
    pub fn from_fps(fps: f32) -> Self {
        let fps = if fps.is_nan() { MIN_FPS } else { fps.clamp(MIN_FPS, MAX_FPS) };
        Self::new(Duration::from_secs_f32(1.0 / fps))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time since the previous frame when a frame is due, `None` otherwise.
    /// The very first poll is always due, with a zero step.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        match self.last {
            None => {
                self.last = Some(now);
                Some(Duration::ZERO)
            }
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                if elapsed >= self.period {
                    self.last = Some(now);
                    Some(elapsed)
                } else {
                    None
                }
            }
        }
    }

    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self.period.saturating_sub(now.saturating_duration_since(last)),
        }
    }
}

/// Seconds to advance the simulation for a frame gap of `elapsed`.
pub fn step_seconds(elapsed: Duration) -> f32 {
    elapsed.min(MAX_STEP).as_secs_f32()
}

#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    fps: f32,
    last_render: Duration,
}

impl FrameStats {
    // smoothing for the displayed fps
    const ALPHA: f32 = 0.1;

    pub fn record(&mut self, interval: Duration, render: Duration) {
        self.frames += 1;
        self.last_render = render;
        let secs = interval.as_secs_f32();
        if secs > 0.0 {
            let instant = 1.0 / secs;
            self.fps = if self.fps == 0.0 { instant } else { self.fps + (instant - self.fps) * Self::ALPHA };
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn lines(&self) -> [String; 2] {
        let us = self.last_render.as_micros();
        let ms = us as f64 / 1000.0;
        [
            format!("{fps:>7.2}fps", fps = self.fps),
            format!("{ms:>7.2}ms ({us:>7}us)"),
        ]
    }

    pub fn overlay(&self, fb: &mut FrameBuffer) {
        for (y, line) in self.lines().iter().enumerate() {
            fb.put_str(0, y as u16, line, Rgb::WHITE);
        }
    }
}
