//! Game balance tunables
//!
//! `Tuning` holds every numeric knob the simulation reads. Four of them
//! (obstacle frequency, pursuer speed multiplier, speed ceiling and speed
//! increase) are recomputed every frame from the distance travelled and
//! return to their baseline on restart.

use serde::{Deserialize, Serialize};

/// Baseline obstacle spawn probability per tile
pub const BASE_OBSTACLE_FREQUENCY: f32 = 0.4;
/// Obstacle spawn probability ceiling
pub const MAX_OBSTACLE_FREQUENCY: f32 = 0.8;
/// Distance at which the obstacle ceiling is reached
pub const OBSTACLE_RAMP_DISTANCE: f32 = 5000.0;

/// Baseline pursuer speed multiplier
pub const BASE_PURSUER_MULTIPLIER: f32 = 0.983;
/// Pursuer speed multiplier floor
pub const MIN_PURSUER_MULTIPLIER: f32 = 0.95;
/// Distance at which the pursuer floor is reached
pub const PURSUER_RAMP_DISTANCE: f32 = 40000.0;

/// Baseline speed ceiling
pub const BASE_MAX_SPEED: f32 = 2.5;
/// Highest speed ceiling
pub const TOP_MAX_SPEED: f32 = 4.0;
/// Distance at which the top ceiling is reached
pub const MAX_SPEED_RAMP_DISTANCE: f32 = 1500.0;

/// Baseline per-frame speed increase
pub const BASE_SPEED_INCREASE: f32 = 0.0007;
/// Distance that adds one unit of per-frame speed increase
pub const SPEED_INCREASE_DIVISOR: f32 = 500_000.0;

/// Obstacle spawn probability for a distance travelled
pub fn obstacle_frequency(distance: f32) -> f32 {
    let t = distance.max(0.0) / OBSTACLE_RAMP_DISTANCE;
    (BASE_OBSTACLE_FREQUENCY + (MAX_OBSTACLE_FREQUENCY - BASE_OBSTACLE_FREQUENCY) * t)
        .min(MAX_OBSTACLE_FREQUENCY)
}

/// Pursuer speed multiplier for a distance travelled
pub fn chaser_speed_multiplier(distance: f32) -> f32 {
    let t = distance.max(0.0) / PURSUER_RAMP_DISTANCE;
    (BASE_PURSUER_MULTIPLIER - (BASE_PURSUER_MULTIPLIER - MIN_PURSUER_MULTIPLIER) * t)
        .max(MIN_PURSUER_MULTIPLIER)
}

/// Speed ceiling for a distance travelled
pub fn max_speed(distance: f32) -> f32 {
    let t = distance.max(0.0) / MAX_SPEED_RAMP_DISTANCE;
    (BASE_MAX_SPEED + (TOP_MAX_SPEED - BASE_MAX_SPEED) * t).min(TOP_MAX_SPEED)
}

/// Per-frame speed increase for a distance travelled
pub fn speed_increase(distance: f32) -> f32 {
    BASE_SPEED_INCREASE + distance.max(0.0) / SPEED_INCREASE_DIVISOR
}

/// Pursuer head start used by `Tuning::play`
pub const PLAY_PURSUER_START_Z: f32 = 1500.0;

/// Numeric tunables read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Track ===
    pub lane_width: f32,

    // === Speed ===
    pub initial_speed: f32,
    pub max_speed: f32,
    pub speed_increase: f32,
    /// Distance credited per unit of track scrolled
    pub distance_multiplier: f32,

    // === Player actions ===
    pub jump_height: f32,
    pub jump_duration_ms: f64,
    pub slide_duration_ms: f64,
    pub lane_change_duration_ms: f64,

    // === Pursuer ===
    pub pursuer_start_z: f32,
    pub pursuer_speed_multiplier: f32,
    pub pursuer_catch_distance: f32,

    // === Spawning ===
    pub obstacle_frequency: f32,
    pub money_frequency: f32,
    pub kids_frequency: f32,

    // === Collision ===
    /// Proximity window for obstacle hits and pickups (longitudinal, lateral, vertical)
    pub collision_tolerance: f32,

    // === Scoring ===
    pub money_value: u64,
    pub kids_value: u64,
    /// Score per unit of distance
    pub distance_score: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_width: 4.0,

            initial_speed: 0.65,
            max_speed: BASE_MAX_SPEED,
            speed_increase: BASE_SPEED_INCREASE,
            distance_multiplier: 1.0,

            jump_height: 4.0,
            jump_duration_ms: 500.0,
            slide_duration_ms: 600.0,
            lane_change_duration_ms: 150.0,

            pursuer_start_z: 11.0,
            pursuer_speed_multiplier: BASE_PURSUER_MULTIPLIER,
            pursuer_catch_distance: 3.0,

            obstacle_frequency: BASE_OBSTACLE_FREQUENCY,
            money_frequency: 0.6,
            kids_frequency: 0.5,

            collision_tolerance: 2.0,

            money_value: 100,
            kids_value: 200,
            distance_score: 10.0,
        }
    }
}

impl Tuning {
    /// Recompute the distance-driven fields
    pub fn apply_progression(&mut self, distance: f32) {
        self.obstacle_frequency = obstacle_frequency(distance);
        self.pursuer_speed_multiplier = chaser_speed_multiplier(distance);
        self.max_speed = max_speed(distance);
        self.speed_increase = speed_increase(distance);
    }

    /// Restore the distance-driven fields to their baseline
    pub fn reset_progression(&mut self) {
        self.apply_progression(0.0);
    }

    /// Tuning the shipped game runs with.
    ///
    /// The pursuer closes in by nearly the whole scroll every frame, so from
    /// the baseline gap of 11 it catches the player within a quarter second.
    /// Its head start is what sets how long a run can last.
    pub fn play() -> Self {
        Self {
            pursuer_start_z: PLAY_PURSUER_START_Z,
            ..Self::default()
        }
    }
}
