//! City Runner - an endless runner down a procedurally generated city road
//!
//! Core modules:
//! - `sim`: Simulation (track generation, player actions, pursuer, collisions)
//! - `game`: Session lifecycle and per-frame orchestration
//! - `renderer`: Transform push seam toward an external renderer
//! - `ui`: HUD snapshot seam
//! - `platform`: Frame clock and input mapping
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance and distance progression

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Track geometry constants
pub mod consts {
    /// Nominal frame interval the per-frame movement is tuned for (60 fps)
    pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta a single frame may simulate, in nominal frames
    pub const MAX_FRAME_RATIO: f64 = 3.0;

    /// Lateral lanes are -1, 0, 1
    pub const MIN_LANE: i8 = -1;
    pub const MAX_LANE: i8 = 1;

    /// Length of one generated road segment
    pub const TILE_LENGTH: f32 = 30.0;
    /// Tiles kept alive ahead of the player
    pub const VISIBLE_TILES: usize = 8;
    /// Tiles scrolled further than this behind the player are pruned
    pub const TILE_PRUNE_Z: f32 = 50.0;
    /// Tiles generated at session start before anything spawns on them
    pub const SAFE_START_TILES: u32 = 2;

    /// The player never moves longitudinally; the world scrolls past Z = 0
    pub const PLAYER_Z: f32 = 0.0;
    /// Height above the player's feet that money is aligned against
    pub const MONEY_CARRY_HEIGHT: f32 = 1.5;
    /// Vertical offset and scale applied while sliding
    pub const SLIDE_OFFSET_Y: f32 = -0.5;
    pub const SLIDE_SCALE_Y: f32 = 0.5;
    /// Roll applied per lane of travel during a lane change (radians)
    pub const LANE_CHANGE_TILT: f32 = -0.2;

    /// Kids drift toward the player inside this longitudinal window
    pub const KID_MAGNET_WINDOW: f32 = 10.0;
    /// Fraction of the lateral gap a kid closes each frame
    pub const KID_MAGNET_RATE: f32 = 0.05;
    /// Fraction of the lateral gap the pursuer closes each frame
    pub const PURSUER_LATERAL_RATE: f32 = 0.02;
    /// Pursuer grows when closer than this
    pub const PURSUER_LOOM_Z: f32 = 10.0;
    /// Pursuer distance at which the danger meter starts filling
    pub const DANGER_RANGE: f32 = 15.0;
}

/// Lateral world X of a lane index
#[inline]
pub fn lane_x(lane: i8, lane_width: f32) -> f32 {
    lane as f32 * lane_width
}

/// Nearest lane index for a lateral offset (not clamped)
#[inline]
pub fn lane_of(x: f32, lane_width: f32) -> i32 {
    (x / lane_width).round() as i32
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
