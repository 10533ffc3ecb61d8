//! Frame timing
//!
//! Movement is tuned per nominal 60 Hz frame. Each callback converts the
//! elapsed wall time into a ratio of nominal frames, clamped so a stalled
//! tab cannot teleport the world forward.

use crate::consts::{MAX_FRAME_RATIO, TARGET_FRAME_MS};

/// Clamped time step for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Clamped elapsed milliseconds
    pub ms: f64,
    /// `ms` expressed in nominal frames
    pub ratio: f32,
}

impl FrameDelta {
    pub const ZERO: FrameDelta = FrameDelta { ms: 0.0, ratio: 0.0 };

    /// Clamp a raw elapsed time
    pub fn from_elapsed(raw_ms: f64) -> Self {
        let ms = raw_ms.clamp(0.0, TARGET_FRAME_MS * MAX_FRAME_RATIO);
        Self {
            ms,
            ratio: (ms / TARGET_FRAME_MS) as f32,
        }
    }
}

/// Tracks the previous callback timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart timing from `now` (session start)
    pub fn reset(&mut self, now: f64) {
        self.last_time = Some(now);
    }

    /// Step from the previous timestamp to `now`
    pub fn advance(&mut self, now: f64) -> FrameDelta {
        let delta = match self.last_time {
            Some(last) => FrameDelta::from_elapsed(now - last),
            None => FrameDelta::ZERO,
        };
        self.last_time = Some(now);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_frame_is_ratio_one() {
        let d = FrameDelta::from_elapsed(TARGET_FRAME_MS);
        assert!((d.ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped_to_three_frames() {
        let mut clock = FrameClock::new();
        clock.reset(1000.0);
        let d = clock.advance(6000.0);
        assert!((d.ratio - 3.0).abs() < 1e-6);
        assert!((d.ms - TARGET_FRAME_MS * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_advance_without_reset_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(500.0), FrameDelta::ZERO);
        let d = clock.advance(500.0 + TARGET_FRAME_MS / 2.0);
        assert!((d.ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.reset(100.0);
        assert_eq!(clock.advance(50.0).ms, 0.0);
    }
}
