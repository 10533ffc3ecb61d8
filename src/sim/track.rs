//! Procedural track generation
//!
//! Every call to `generate_tile` lays one 30-unit road segment at the next
//! slot ahead of the player, dresses it with buildings and street lights,
//! and rolls independently for an obstacle, a money pattern and a batch of
//! kids. The first tiles of a session stay empty so the run starts clean.

use std::f32::consts::PI;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entities::{EntityId, Kid, Money, Obstacle, ObstacleKind, Registry, Tile};
use crate::consts::{MONEY_CARRY_HEIGHT, SAFE_START_TILES, TILE_LENGTH};
use crate::lane_x;
use crate::tuning::Tuning;

/// Building colour palette (index into this from `Building::color`)
pub const BUILDING_COLORS: [u32; 4] = [0x3a3a4a, 0x4a4a5a, 0x2a2a3a, 0x5a5a6a];
/// Probability a building window is lit
pub const WINDOW_LIT_CHANCE: f32 = 0.7;
/// Columns in a building's window grid
pub const WINDOW_COLUMNS: u32 = 3;
/// Height of money items in line and scattered layouts
pub const MONEY_BASE_HEIGHT: f32 = MONEY_CARRY_HEIGHT;
/// Base height kids bounce around
pub const KID_BASE_HEIGHT: f32 = 0.8;

/// A building flanking the road
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Building {
    /// Centre position relative to the tile (y is half the height)
    pub position: Vec3,
    pub height: f32,
    /// Index into `BUILDING_COLORS`
    pub color: u8,
    /// Window rows (every 4 units from y = 3 up to 2 below the roof)
    pub window_rows: u32,
    /// Bit `row * WINDOW_COLUMNS + column` is set when that window is lit
    pub lit_windows: u32,
}

impl Building {
    pub fn is_lit(&self, row: u32, column: u32) -> bool {
        row < self.window_rows
            && column < WINDOW_COLUMNS
            && self.lit_windows & (1 << (row * WINDOW_COLUMNS + column)) != 0
    }
}

/// Static dressing for one tile
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TileDecor {
    pub buildings: Vec<Building>,
    /// Street light pole bases relative to the tile
    pub street_lights: Vec<Vec3>,
}

/// Money layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyPattern {
    /// Five bills down one lane
    Line,
    /// Five bills arching over one lane
    Arc,
    /// Three bills in random lanes
    Scattered,
}

impl MoneyPattern {
    pub const ALL: [MoneyPattern; 3] = [MoneyPattern::Line, MoneyPattern::Arc, MoneyPattern::Scattered];
}

/// Lays out tiles and their contents from a seeded random source
#[derive(Debug, Clone)]
pub struct TrackGenerator {
    rng: Pcg32,
    /// Distance ahead of the player where the next tile goes (scrolls with the world)
    pub next_tile_z: f32,
    /// Tiles generated this session
    pub tiles_generated: u32,
    /// Generate lit-window grids on buildings
    pub building_windows: bool,
}

impl TrackGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_tile_z: 0.0,
            tiles_generated: 0,
            building_windows: true,
        }
    }

    /// Keep the next slot glued to the end of the scrolled road
    pub fn scroll(&mut self, amount: f32) {
        self.next_tile_z -= amount;
    }

    /// Append one tile at the next slot and populate it
    pub fn generate_tile(&mut self, registry: &mut Registry, tuning: &Tuning) -> EntityId {
        let tile_z = -self.next_tile_z;
        let decor = self.decorate(tuning.lane_width);
        let id = registry.next_entity_id();
        registry.push_tile(Tile {
            id,
            index: self.tiles_generated,
            z: tile_z,
            decor,
        });

        if self.tiles_generated >= SAFE_START_TILES {
            if self.rng.random::<f32>() < tuning.obstacle_frequency {
                self.add_obstacle(registry, id);
            }
            if self.rng.random::<f32>() < tuning.money_frequency {
                self.add_money(registry, id, tile_z, tuning);
            }
            if self.rng.random::<f32>() < tuning.kids_frequency {
                self.add_kids(registry, id, tile_z, tuning);
            }
        }

        log::debug!(
            "Tile {} generated at z={} ({} obstacles, {} money, {} kids live)",
            self.tiles_generated,
            tile_z,
            registry.obstacles.len(),
            registry.money.len(),
            registry.kids.len()
        );

        self.tiles_generated += 1;
        self.next_tile_z += TILE_LENGTH;
        id
    }

    fn random_lane(&mut self) -> i8 {
        self.rng.random_range(-1..=1)
    }

    fn decorate(&mut self, lane_width: f32) -> TileDecor {
        let mut buildings = Vec::with_capacity(4);
        for side in [-1.0f32, 1.0] {
            for z in [-10.0f32, 10.0] {
                let height = 15.0 + self.rng.random::<f32>() * 25.0;
                let color = self.rng.random_range(0..BUILDING_COLORS.len()) as u8;
                let mut building = Building {
                    position: Vec3::new(side * (lane_width * 1.5 + 8.0), height / 2.0, z),
                    height,
                    color,
                    window_rows: 0,
                    lit_windows: 0,
                };
                if self.building_windows {
                    self.light_windows(&mut building);
                }
                buildings.push(building);
            }
        }

        let street_lights = [-1.0f32, 1.0]
            .iter()
            .map(|side| Vec3::new(side * (lane_width * 1.5 + 1.0), 0.0, 0.0))
            .collect();

        TileDecor {
            buildings,
            street_lights,
        }
    }

    fn light_windows(&mut self, building: &mut Building) {
        let mut row = 0;
        let mut y = 3.0;
        while y < building.height - 2.0 {
            for column in 0..WINDOW_COLUMNS {
                if self.rng.random::<f32>() < WINDOW_LIT_CHANCE {
                    building.lit_windows |= 1 << (row * WINDOW_COLUMNS + column);
                }
            }
            row += 1;
            y += 4.0;
        }
        building.window_rows = row;
    }

    fn add_obstacle(&mut self, registry: &mut Registry, tile: EntityId) {
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        let lane = self.random_lane();
        let local_z = (self.rng.random::<f32>() - 0.5) * 15.0;
        let id = registry.next_entity_id();
        registry.obstacles.push(Obstacle {
            id,
            tile,
            kind,
            lane,
            local_z,
            hit: false,
        });
    }

    fn add_money(&mut self, registry: &mut Registry, tile: EntityId, tile_z: f32, tuning: &Tuning) {
        let pattern = MoneyPattern::ALL[self.rng.random_range(0..MoneyPattern::ALL.len())];
        let x = lane_x(self.random_lane(), tuning.lane_width);

        let mut items: Vec<(f32, f32, f32)> = Vec::with_capacity(5);
        match pattern {
            MoneyPattern::Line => {
                for i in 0..5 {
                    items.push((x, MONEY_BASE_HEIGHT, -10.0 + i as f32 * 4.0));
                }
            }
            MoneyPattern::Arc => {
                for i in 0..5 {
                    let height = MONEY_BASE_HEIGHT + (i as f32 / 4.0 * PI).sin() * 2.0;
                    items.push((x, height, -8.0 + i as f32 * 4.0));
                }
            }
            MoneyPattern::Scattered => {
                for _ in 0..3 {
                    let lane = self.random_lane();
                    let z = (self.rng.random::<f32>() - 0.5) * 20.0;
                    items.push((lane_x(lane, tuning.lane_width), MONEY_BASE_HEIGHT, z));
                }
            }
        }

        for (x, y, local_z) in items {
            let id = registry.next_entity_id();
            registry.money.push(Money {
                id,
                tile,
                x,
                y,
                local_z,
                collected: false,
            });
        }
        log::trace!("Money {:?} on tile at z={}", pattern, tile_z);
    }

    fn add_kids(&mut self, registry: &mut Registry, tile: EntityId, tile_z: f32, tuning: &Tuning) {
        let count = self.rng.random_range(1..=2);
        for _ in 0..count {
            let x = lane_x(self.random_lane(), tuning.lane_width);
            let local_z = (self.rng.random::<f32>() - 0.5) * 20.0;
            let id = registry.next_entity_id();
            registry.kids.push(Kid {
                id,
                tile,
                x,
                origin_x: x,
                local_z,
                spawn_z: tile_z + local_z,
                collected: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_spawn() -> Tuning {
        Tuning {
            obstacle_frequency: 1.0,
            money_frequency: 1.0,
            kids_frequency: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tiles_advance_by_tile_length() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(7);
        let tuning = Tuning::default();
        for _ in 0..4 {
            track.generate_tile(&mut registry, &tuning);
        }
        let zs: Vec<f32> = registry.tiles.iter().map(|t| t.z).collect();
        assert_eq!(zs, vec![0.0, -30.0, -60.0, -90.0]);
        assert_eq!(track.next_tile_z, 120.0);
        assert_eq!(track.tiles_generated, 4);
    }

    #[test]
    fn test_new_tiles_follow_scrolled_road() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(7);
        let tuning = Tuning::default();
        for _ in 0..3 {
            track.generate_tile(&mut registry, &tuning);
        }
        registry.scroll(45.0);
        track.scroll(45.0);
        track.generate_tile(&mut registry, &tuning);
        let zs: Vec<f32> = registry.tiles.iter().map(|t| t.z).collect();
        assert_eq!(zs, vec![45.0, 15.0, -15.0, -45.0]);
    }

    #[test]
    fn test_safe_start_tiles_stay_empty() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(1);
        let tuning = always_spawn();
        track.generate_tile(&mut registry, &tuning);
        track.generate_tile(&mut registry, &tuning);
        assert!(registry.obstacles.is_empty());
        assert!(registry.money.is_empty());
        assert!(registry.kids.is_empty());

        let third = track.generate_tile(&mut registry, &tuning);
        assert_eq!(registry.obstacles.len(), 1);
        assert!(registry.money.len() == 3 || registry.money.len() == 5);
        assert!((1..=2).contains(&registry.kids.len()));
        assert!(registry.obstacles.iter().all(|o| o.tile == third));
    }

    #[test]
    fn test_zero_frequencies_spawn_nothing() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(3);
        let tuning = Tuning {
            obstacle_frequency: 0.0,
            money_frequency: 0.0,
            kids_frequency: 0.0,
            ..Default::default()
        };
        for _ in 0..20 {
            track.generate_tile(&mut registry, &tuning);
        }
        assert!(registry.obstacles.is_empty());
        assert!(registry.money.is_empty());
        assert!(registry.kids.is_empty());
    }

    #[test]
    fn test_spawned_entities_stay_in_bounds() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(99);
        let tuning = always_spawn();
        for _ in 0..200 {
            track.generate_tile(&mut registry, &tuning);
        }
        let mut kinds = std::collections::HashSet::new();
        for o in &registry.obstacles {
            assert!((-1..=1).contains(&o.lane));
            assert!((-7.5..7.5).contains(&o.local_z));
            kinds.insert(o.kind);
        }
        // 198 uniform draws over 4 variants hit all of them
        assert_eq!(kinds.len(), 4);
        for m in &registry.money {
            let lane = crate::lane_of(m.x, tuning.lane_width);
            assert!((-1..=1).contains(&lane));
            assert!((-10.0..=10.0).contains(&m.local_z));
        }
        for k in &registry.kids {
            assert_eq!(k.x, k.origin_x);
            assert!((-10.0..10.0).contains(&k.local_z));
        }
    }

    #[test]
    fn test_same_seed_same_track() {
        let tuning = always_spawn();
        let mut a = (Registry::new(), TrackGenerator::new(42));
        let mut b = (Registry::new(), TrackGenerator::new(42));
        for _ in 0..10 {
            a.1.generate_tile(&mut a.0, &tuning);
            b.1.generate_tile(&mut b.0, &tuning);
        }
        let lanes_a: Vec<_> = a.0.obstacles.iter().map(|o| (o.lane, o.kind)).collect();
        let lanes_b: Vec<_> = b.0.obstacles.iter().map(|o| (o.lane, o.kind)).collect();
        assert_eq!(lanes_a, lanes_b);
        assert_eq!(a.0.tiles[5].decor, b.0.tiles[5].decor);
    }

    #[test]
    fn test_decor_layout() {
        let mut registry = Registry::new();
        let mut track = TrackGenerator::new(5);
        track.generate_tile(&mut registry, &Tuning::default());
        let decor = &registry.tiles[0].decor;
        assert_eq!(decor.buildings.len(), 4);
        assert_eq!(decor.street_lights.len(), 2);
        for b in &decor.buildings {
            assert!((15.0..40.0).contains(&b.height));
            assert_eq!(b.position.x.abs(), 14.0);
            assert!((3..=9).contains(&b.window_rows));
            assert!(b.lit_windows < (1 << (b.window_rows * WINDOW_COLUMNS)));
        }

        track.building_windows = false;
        track.generate_tile(&mut registry, &Tuning::default());
        assert!(registry.tiles[1].decor.buildings.iter().all(|b| b.window_rows == 0));
    }
}
