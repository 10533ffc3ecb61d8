//! Player controller
//!
//! Three timed actions, each sampled every frame against the simulation
//! clock rather than scheduled:
//! - lane change (150 ms, cubic ease-out with a decaying roll)
//! - jump (500 ms, `sin(progress * PI)` arc)
//! - slide (600 ms, squashed to half height)
//!
//! Jump and slide exclude each other; a lane change may run alongside
//! either.

use std::f32::consts::PI;

use crate::consts::{LANE_CHANGE_TILT, MAX_LANE, MIN_LANE, SLIDE_OFFSET_Y, SLIDE_SCALE_Y};
use crate::tuning::Tuning;
use crate::{ease_out_cubic, lane_x};

/// The runner's lane, pose and action timers
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Lane the player occupies for collisions (-1, 0, 1)
    pub lane: i8,
    /// Lane being moved toward; equal to `lane` when not changing lanes
    pub target_lane: i8,
    /// Lateral position
    pub x: f32,
    /// Vertical offset (positive while airborne, negative while sliding)
    pub y: f32,
    /// Vertical scale (halved while sliding)
    pub scale_y: f32,
    /// Roll around the running axis during lane changes
    pub roll: f32,
    pub jumping: bool,
    pub sliding: bool,
    pub jump_start_ms: f64,
    pub slide_start_ms: f64,
    pub lane_change_start_ms: f64,
    /// Lateral position when the current lane change began
    pub lane_change_start_x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: 0,
            target_lane: 0,
            x: 0.0,
            y: 0.0,
            scale_y: 1.0,
            roll: 0.0,
            jumping: false,
            sliding: false,
            jump_start_ms: 0.0,
            slide_start_ms: 0.0,
            lane_change_start_ms: 0.0,
            lane_change_start_x: 0.0,
        }
    }
}

impl Player {
    pub fn is_changing_lane(&self) -> bool {
        self.target_lane != self.lane
    }

    /// Start a lane change by `direction` (-1 left, +1 right).
    /// No-op while already changing lanes or at the edge of the road.
    pub fn try_change_lane(&mut self, direction: i8, now_ms: f64) -> bool {
        if self.is_changing_lane() {
            return false;
        }
        let target = self.lane + direction.signum();
        if !(MIN_LANE..=MAX_LANE).contains(&target) || target == self.lane {
            return false;
        }
        self.target_lane = target;
        self.lane_change_start_ms = now_ms;
        self.lane_change_start_x = self.x;
        true
    }

    /// Start a jump unless already jumping or sliding
    pub fn try_jump(&mut self, now_ms: f64) -> bool {
        if self.jumping || self.sliding {
            return false;
        }
        self.jumping = true;
        self.jump_start_ms = now_ms;
        true
    }

    /// Start a slide unless already jumping or sliding
    pub fn try_slide(&mut self, now_ms: f64) -> bool {
        if self.jumping || self.sliding {
            return false;
        }
        self.sliding = true;
        self.slide_start_ms = now_ms;
        true
    }

    /// Sample every running action at `now_ms`
    pub fn update(&mut self, now_ms: f64, tuning: &Tuning) {
        if self.is_changing_lane() {
            self.update_lane_change(now_ms, tuning);
        }
        if self.jumping {
            self.update_jump(now_ms, tuning);
        }
        if self.sliding {
            self.update_slide(now_ms, tuning);
        }
    }

    fn update_lane_change(&mut self, now_ms: f64, tuning: &Tuning) {
        let progress = action_progress(now_ms, self.lane_change_start_ms, tuning.lane_change_duration_ms)
            .min(1.0);
        let target_x = lane_x(self.target_lane, tuning.lane_width);
        let eased = ease_out_cubic(progress);

        self.x = self.lane_change_start_x + (target_x - self.lane_change_start_x) * eased;
        self.roll = (self.target_lane - self.lane) as f32 * LANE_CHANGE_TILT * (1.0 - progress);

        if progress >= 1.0 {
            self.lane = self.target_lane;
            self.x = target_x;
            self.roll = 0.0;
        }
    }

    fn update_jump(&mut self, now_ms: f64, tuning: &Tuning) {
        let progress = action_progress(now_ms, self.jump_start_ms, tuning.jump_duration_ms);
        if progress < 1.0 {
            self.y = (progress * PI).sin() * tuning.jump_height;
        } else {
            self.y = 0.0;
            self.jumping = false;
        }
    }

    fn update_slide(&mut self, now_ms: f64, tuning: &Tuning) {
        if now_ms - self.slide_start_ms < tuning.slide_duration_ms {
            self.scale_y = SLIDE_SCALE_Y;
            self.y = SLIDE_OFFSET_Y;
        } else {
            self.scale_y = 1.0;
            self.y = 0.0;
            self.sliding = false;
        }
    }
}

/// Fraction of `duration_ms` elapsed since `start_ms` (not clamped)
fn action_progress(now_ms: f64, start_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms).max(0.0) / duration_ms) as f32
}
