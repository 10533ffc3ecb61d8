//! The pursuer
//!
//! A single antagonist behind the player. Its Z is the gap to the player;
//! once the gap drops under the catch distance the run is over.

use crate::consts::{PURSUER_LATERAL_RATE, PURSUER_LOOM_Z};

/// Z the pursuer waits at during the intro
pub const INTRO_Z: f32 = 8.0;
/// Scale during the intro
pub const INTRO_SCALE: f32 = 1.3;
/// Extra scale per unit of gap under `PURSUER_LOOM_Z`
pub const LOOM_SCALE_PER_UNIT: f32 = 0.02;
/// Bobbing amplitude while running
pub const BOB_HEIGHT: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Pursuer {
    /// Gap to the player along the road
    pub z: f32,
    /// Lateral position, lagging behind the player's lane
    pub x: f32,
    /// Running bob (cosmetic)
    pub y: f32,
    /// Uniform scale (cosmetic proximity cue)
    pub scale: f32,
}

impl Pursuer {
    pub fn new(start_z: f32) -> Self {
        Self {
            z: start_z,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }

    /// Looming pose shown before the run starts
    pub fn intro() -> Self {
        Self {
            scale: INTRO_SCALE,
            ..Self::new(INTRO_Z)
        }
    }

    /// Close in by this frame's share of the track movement
    pub fn advance(&mut self, move_amount: f32, speed_multiplier: f32) {
        self.z -= move_amount * speed_multiplier;
    }

    /// Ease laterally toward `target_x` by a fixed fraction of the gap
    pub fn track(&mut self, target_x: f32) {
        self.x += (target_x - self.x) * PURSUER_LATERAL_RATE;
    }

    /// Update the cosmetic bob and proximity scale
    pub fn update_pose(&mut self, now_ms: f64) {
        self.y = ((now_ms * 0.01).sin() as f32) * BOB_HEIGHT;
        self.scale = if self.z < PURSUER_LOOM_Z {
            1.0 + (PURSUER_LOOM_Z - self.z) * LOOM_SCALE_PER_UNIT
        } else {
            1.0
        };
    }

    pub fn has_caught(&self, catch_distance: f32) -> bool {
        self.z < catch_distance
    }

    /// Whole units of gap for display
    pub fn display_distance(&self) -> u32 {
        self.z.max(0.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_with_multiplier() {
        let mut pursuer = Pursuer::new(11.0);
        pursuer.advance(1.0, 0.5);
        assert_eq!(pursuer.z, 10.5);
        assert!(!pursuer.has_caught(3.0));
        pursuer.advance(8.0, 1.0);
        assert!(pursuer.has_caught(3.0));
    }

    #[test]
    fn test_lateral_tracking_is_exponential() {
        let mut pursuer = Pursuer::new(11.0);
        pursuer.track(4.0);
        assert!((pursuer.x - 0.08).abs() < 1e-6);
        for _ in 0..500 {
            pursuer.track(4.0);
        }
        assert!((pursuer.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_scale_grows_only_when_close() {
        let mut pursuer = Pursuer::new(12.0);
        pursuer.update_pose(0.0);
        assert_eq!(pursuer.scale, 1.0);
        pursuer.z = 5.0;
        pursuer.update_pose(0.0);
        assert!((pursuer.scale - 1.1).abs() < 1e-6);
        assert_eq!(pursuer.display_distance(), 5);
        pursuer.z = -1.0;
        assert_eq!(pursuer.display_distance(), 0);
    }
}
