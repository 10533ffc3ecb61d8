//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform
//! dependencies:
//! - Time enters only as clamped frame deltas
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, DOM or storage access

pub mod collision;
pub mod effects;
pub mod entities;
pub mod environment;
pub mod player;
pub mod pursuer;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{ObstacleHit, Pickups, obstacle_blocks, score};
pub use effects::{EffectKind, Effects};
pub use entities::{EntityId, EntityRef, ObstacleKind, Registry};
pub use environment::Environment;
pub use player::Player;
pub use pursuer::Pursuer;
pub use state::{Character, GameEvent, GamePhase, GameState, Outcome, Palette};
pub use tick::{TickInput, tick};
pub use track::{TileDecor, TrackGenerator};
