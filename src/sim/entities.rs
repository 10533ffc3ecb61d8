//! Entity registry
//!
//! Tiles, obstacles and pickups live in flat arenas keyed by `EntityId`.
//! Obstacles and pickups are positioned relative to the tile that spawned
//! them; pruning a tile retires everything it carried.

use super::track::TileDecor;
use crate::consts::TILE_PRUNE_Z;

/// Stable identifier, unique within a session
pub type EntityId = u32;

/// Reference to any registry entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Tile(EntityId),
    Obstacle(EntityId),
    Money(EntityId),
    Kid(EntityId),
}

/// A fixed-length road segment
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: EntityId,
    /// Generation order within the session (0-based)
    pub index: u32,
    /// World Z of the tile centre; grows as the road scrolls toward the player
    pub z: f32,
    pub decor: TileDecor,
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    /// Low police barrier: jump over
    Barrier,
    /// Police tape: slide under
    Tape,
    /// Trash can: jump over
    Trash,
    /// Police car: blocks the whole lane
    Vehicle,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Barrier,
        ObstacleKind::Tape,
        ObstacleKind::Trash,
        ObstacleKind::Vehicle,
    ];

    /// Height the player must clear (or, for tape, the height it hangs at)
    pub fn height(&self) -> f32 {
        match self {
            ObstacleKind::Barrier => 1.0,
            ObstacleKind::Tape => 3.0,
            ObstacleKind::Trash => 0.8,
            ObstacleKind::Vehicle => 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Barrier => "barrier",
            ObstacleKind::Tape => "tape",
            ObstacleKind::Trash => "trash",
            ObstacleKind::Vehicle => "vehicle",
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    pub tile: EntityId,
    pub kind: ObstacleKind,
    pub lane: i8,
    /// Z offset from the owning tile
    pub local_z: f32,
    /// Set once the obstacle ends a run
    pub hit: bool,
}

/// A currency pickup
#[derive(Debug, Clone)]
pub struct Money {
    pub id: EntityId,
    pub tile: EntityId,
    /// Lateral offset (a lane centre)
    pub x: f32,
    /// Height above the road
    pub y: f32,
    pub local_z: f32,
    pub collected: bool,
}

/// A bonus collectible that drifts toward the player
#[derive(Debug, Clone)]
pub struct Kid {
    pub id: EntityId,
    pub tile: EntityId,
    /// Current lateral position (moves under magnetism)
    pub x: f32,
    /// Lane centre it spawned on
    pub origin_x: f32,
    pub local_z: f32,
    /// World Z at spawn time (animation phase)
    pub spawn_z: f32,
    pub collected: bool,
}

/// Arena of live track entities
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Sorted by id (generation order)
    pub tiles: Vec<Tile>,
    pub obstacles: Vec<Obstacle>,
    pub money: Vec<Money>,
    pub kids: Vec<Kid>,
    /// Tiles added since the last drain (for the renderer)
    spawned: Vec<EntityId>,
    /// Entities removed or collected since the last drain
    retired: Vec<EntityRef>,
    next_id: EntityId,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_tile(&mut self, tile: Tile) {
        self.spawned.push(tile.id);
        self.tiles.push(tile);
    }

    pub fn tile(&self, id: EntityId) -> Option<&Tile> {
        self.tiles
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|i| &self.tiles[i])
    }

    /// World Z of a point `local_z` from a tile's centre
    pub fn world_z(&self, tile: EntityId, local_z: f32) -> Option<f32> {
        self.tile(tile).map(|t| t.z + local_z)
    }

    /// Move every tile (and so every child entity) toward the player
    pub fn scroll(&mut self, amount: f32) {
        for tile in &mut self.tiles {
            tile.z += amount;
        }
    }

    /// Drop tiles that scrolled past the prune margin, with their entities.
    /// Returns the number of tiles removed.
    pub fn prune(&mut self) -> usize {
        let before = self.tiles.len();
        let mut removed = Vec::new();
        self.tiles.retain(|t| {
            if t.z > TILE_PRUNE_Z {
                removed.push(t.id);
                false
            } else {
                true
            }
        });
        if removed.is_empty() {
            return 0;
        }

        let retired = &mut self.retired;
        self.obstacles.retain(|o| {
            let dead = removed.contains(&o.tile);
            if dead {
                retired.push(EntityRef::Obstacle(o.id));
            }
            !dead
        });
        self.money.retain(|m| {
            let dead = removed.contains(&m.tile);
            if dead && !m.collected {
                retired.push(EntityRef::Money(m.id));
            }
            !dead
        });
        self.kids.retain(|k| {
            let dead = removed.contains(&k.tile);
            if dead && !k.collected {
                retired.push(EntityRef::Kid(k.id));
            }
            !dead
        });
        retired.extend(removed.iter().map(|&id| EntityRef::Tile(id)));

        before - self.tiles.len()
    }

    /// Note an entity that should disappear from view
    pub fn retire(&mut self, entity: EntityRef) {
        self.retired.push(entity);
    }

    /// Take the tiles spawned since the last call
    pub fn drain_spawned(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.spawned)
    }

    /// Take the entities retired since the last call
    pub fn drain_retired(&mut self) -> Vec<EntityRef> {
        std::mem::take(&mut self.retired)
    }

    /// Every entity reference currently alive
    pub fn live_refs(&self) -> Vec<EntityRef> {
        let mut refs = Vec::with_capacity(
            self.tiles.len() + self.obstacles.len() + self.money.len() + self.kids.len(),
        );
        refs.extend(self.tiles.iter().map(|t| EntityRef::Tile(t.id)));
        refs.extend(self.obstacles.iter().map(|o| EntityRef::Obstacle(o.id)));
        refs.extend(self.money.iter().map(|m| EntityRef::Money(m.id)));
        refs.extend(self.kids.iter().map(|k| EntityRef::Kid(k.id)));
        refs
    }

    /// Remove everything, including pending render notifications
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(registry: &mut Registry, z: f32) -> EntityId {
        let id = registry.next_entity_id();
        registry.push_tile(Tile {
            id,
            index: 0,
            z,
            decor: TileDecor::default(),
        });
        id
    }

    #[test]
    fn test_world_z_follows_tile() {
        let mut registry = Registry::new();
        let t = tile(&mut registry, -30.0);
        assert_eq!(registry.world_z(t, 5.0), Some(-25.0));
        registry.scroll(10.0);
        assert_eq!(registry.world_z(t, 5.0), Some(-15.0));
        assert_eq!(registry.world_z(999, 0.0), None);
    }

    #[test]
    fn test_prune_removes_children_with_tile() {
        let mut registry = Registry::new();
        let near = tile(&mut registry, 45.0);
        let far = tile(&mut registry, -60.0);
        let obstacle_id = registry.next_entity_id();
        registry.obstacles.push(Obstacle {
            id: obstacle_id,
            tile: near,
            kind: ObstacleKind::Trash,
            lane: 0,
            local_z: 0.0,
            hit: false,
        });
        let money_id = registry.next_entity_id();
        registry.money.push(Money {
            id: money_id,
            tile: far,
            x: 0.0,
            y: 1.5,
            local_z: 0.0,
            collected: false,
        });
        registry.drain_spawned();

        registry.scroll(10.0);
        assert_eq!(registry.prune(), 1);
        assert!(registry.tile(near).is_none());
        assert!(registry.obstacles.is_empty());
        assert_eq!(registry.money.len(), 1);

        let retired = registry.drain_retired();
        assert!(retired.contains(&EntityRef::Tile(near)));
        assert!(retired.contains(&EntityRef::Obstacle(obstacle_id)));
        assert!(registry.drain_retired().is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut registry = Registry::new();
        let a = registry.next_entity_id();
        let b = registry.next_entity_id();
        assert!(b > a);
        registry.clear();
        assert_eq!(registry.next_entity_id(), 1);
        assert!(registry.live_refs().is_empty());
    }
}
