//! Rendering seam
//!
//! The 3D scene lives outside this crate. Each frame the core pushes
//! transforms for everything that moves, announces spawns and removals,
//! then triggers a render. The core never reads anything back.

pub mod transforms;

use glam::{Quat, Vec3};

use crate::sim::entities::{Kid, Money, Obstacle, Tile};
use crate::sim::{Character, EntityRef, Environment, GameState};

/// Something the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    Player,
    Pursuer,
    Entity(EntityRef),
}

/// Position, orientation and scale pushed for one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

/// A newly created entity, with everything needed to build its meshes
#[derive(Debug, Clone, Copy)]
pub enum Spawn<'a> {
    Tile(&'a Tile),
    Obstacle(&'a Obstacle),
    Money(&'a Money),
    Kid(&'a Kid),
}

impl Spawn<'_> {
    pub fn entity(&self) -> EntityRef {
        match self {
            Spawn::Tile(t) => EntityRef::Tile(t.id),
            Spawn::Obstacle(o) => EntityRef::Obstacle(o.id),
            Spawn::Money(m) => EntityRef::Money(m.id),
            Spawn::Kid(k) => EntityRef::Kid(k.id),
        }
    }
}

/// Receiver of scene updates. Only `set_transform` and `render` are required.
pub trait RenderSink {
    fn spawn(&mut self, _spawn: Spawn<'_>) {}

    fn despawn(&mut self, _entity: EntityRef) {}

    fn set_transform(&mut self, target: RenderTarget, transform: Transform);

    /// Ambient and fog colours changed
    fn set_environment(&mut self, _environment: Environment) {}

    fn set_character(&mut self, _character: Character) {}

    /// Drop every spawned entity (session reset)
    fn clear_scene(&mut self) {}

    fn render(&mut self);
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl RenderSink for NullRenderer {
    fn set_transform(&mut self, _target: RenderTarget, _transform: Transform) {}

    fn render(&mut self) {
        self.frames += 1;
    }
}

/// Push one frame of scene state, then render.
/// `now_ms` drives cosmetic animation only.
pub fn push_frame(state: &mut GameState, sink: &mut dyn RenderSink, now_ms: f64) {
    for entity in state.registry.drain_retired() {
        sink.despawn(entity);
    }

    let spawned = state.registry.drain_spawned();
    let registry = &state.registry;
    for tile_id in spawned {
        let Some(tile) = registry.tile(tile_id) else {
            continue;
        };
        sink.spawn(Spawn::Tile(tile));
        for o in registry.obstacles.iter().filter(|o| o.tile == tile_id) {
            sink.spawn(Spawn::Obstacle(o));
        }
        for m in registry.money.iter().filter(|m| m.tile == tile_id) {
            sink.spawn(Spawn::Money(m));
        }
        for k in registry.kids.iter().filter(|k| k.tile == tile_id) {
            sink.spawn(Spawn::Kid(k));
        }
    }

    for tile in &registry.tiles {
        sink.set_transform(
            RenderTarget::Entity(EntityRef::Tile(tile.id)),
            transforms::tile(tile),
        );
    }
    for o in &registry.obstacles {
        if let Some(z) = registry.world_z(o.tile, o.local_z) {
            sink.set_transform(
                RenderTarget::Entity(EntityRef::Obstacle(o.id)),
                transforms::obstacle(o, z, state.tuning.lane_width),
            );
        }
    }
    for m in registry.money.iter().filter(|m| !m.collected) {
        if let Some(z) = registry.world_z(m.tile, m.local_z) {
            sink.set_transform(
                RenderTarget::Entity(EntityRef::Money(m.id)),
                transforms::money(m, z, now_ms),
            );
        }
    }
    for k in registry.kids.iter().filter(|k| !k.collected) {
        if let Some(z) = registry.world_z(k.tile, k.local_z) {
            sink.set_transform(
                RenderTarget::Entity(EntityRef::Kid(k.id)),
                transforms::kid(k, z, now_ms),
            );
        }
    }

    sink.set_transform(RenderTarget::Player, transforms::player(&state.player));
    sink.set_transform(RenderTarget::Pursuer, transforms::pursuer(&state.pursuer));
    sink.render();
}
