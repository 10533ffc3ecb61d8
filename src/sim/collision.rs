//! Collision and scoring
//!
//! Proximity checks between the player (fixed at `PLAYER_Z`) and the
//! entities scrolling past. All tests are axis-aligned distance windows;
//! the longitudinal window is `Tuning::collision_tolerance`.

use super::entities::{EntityId, EntityRef, ObstacleKind, Registry};
use super::player::Player;
use crate::consts::{KID_MAGNET_RATE, KID_MAGNET_WINDOW, MONEY_CARRY_HEIGHT, PLAYER_Z};
use crate::lane_of;
use crate::tuning::Tuning;

/// An obstacle that ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleHit {
    pub id: EntityId,
    pub kind: ObstacleKind,
}

/// Pickups collected in one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pickups {
    pub money: u32,
    pub kids: u32,
}

/// Whether an obstacle in the player's lane and range stops them
pub fn obstacle_blocks(kind: ObstacleKind, player_y: f32, sliding: bool) -> bool {
    match kind {
        ObstacleKind::Barrier | ObstacleKind::Trash => player_y < kind.height(),
        ObstacleKind::Tape => !sliding,
        ObstacleKind::Vehicle => true,
    }
}

/// First unresolved obstacle that ends the run, marked as hit
pub fn check_obstacles(registry: &mut Registry, player: &Player, tolerance: f32) -> Option<ObstacleHit> {
    let index = registry.obstacles.iter().position(|o| {
        if o.hit || o.lane != player.lane {
            return false;
        }
        let Some(z) = registry.world_z(o.tile, o.local_z) else {
            return false;
        };
        (z - PLAYER_Z).abs() < tolerance && obstacle_blocks(o.kind, player.y, player.sliding)
    })?;

    let obstacle = &mut registry.obstacles[index];
    obstacle.hit = true;
    Some(ObstacleHit {
        id: obstacle.id,
        kind: obstacle.kind,
    })
}

/// Collect money in the player's lane at carrying height.
/// Collected items are retired from view. Returns the number collected.
pub fn check_money(registry: &mut Registry, player: &Player, tuning: &Tuning) -> u32 {
    let tolerance = tuning.collision_tolerance;
    let mut collected = Vec::new();
    for (i, m) in registry.money.iter().enumerate() {
        if m.collected {
            continue;
        }
        let Some(z) = registry.world_z(m.tile, m.local_z) else {
            continue;
        };
        let same_lane = lane_of(m.x, tuning.lane_width) == player.lane as i32;
        let aligned = (m.y - player.y - MONEY_CARRY_HEIGHT).abs() < tolerance;
        if (z - PLAYER_Z).abs() < tolerance && same_lane && aligned {
            collected.push(i);
        }
    }

    for &i in &collected {
        let money = &mut registry.money[i];
        money.collected = true;
        let id = money.id;
        registry.retire(EntityRef::Money(id));
    }
    collected.len() as u32
}

/// Pull nearby kids toward the player, then collect those within reach.
/// Returns the number collected.
pub fn check_kids(registry: &mut Registry, player: &Player, tolerance: f32) -> u32 {
    let zs: Vec<Option<f32>> = registry
        .kids
        .iter()
        .map(|k| registry.world_z(k.tile, k.local_z))
        .collect();

    let mut collected = Vec::new();
    for (kid, z) in registry.kids.iter_mut().zip(zs) {
        let Some(z) = z else { continue };
        if kid.collected {
            continue;
        }
        let dz = (z - PLAYER_Z).abs();
        // Pickup is judged on where the kid stood before this frame's drift
        let x = kid.x;
        if dz < KID_MAGNET_WINDOW {
            kid.x += (player.x - kid.x) * KID_MAGNET_RATE;
        }
        if dz < tolerance && (x - player.x).abs() < tolerance {
            kid.collected = true;
            collected.push(kid.id);
        }
    }

    for &id in &collected {
        registry.retire(EntityRef::Kid(id));
    }
    collected.len() as u32
}

/// Run both pickup checks in order
pub fn check_pickups(registry: &mut Registry, player: &Player, tuning: &Tuning) -> Pickups {
    let money = check_money(registry, player, tuning);
    let kids = check_kids(registry, player, tuning.collision_tolerance);
    Pickups { money, kids }
}

/// Score derived from the current tallies
pub fn score(distance: f32, money: u32, kids: u32, tuning: &Tuning) -> u64 {
    let distance_points = (distance.max(0.0) * tuning.distance_score).floor() as u64;
    distance_points + money as u64 * tuning.money_value + kids as u64 * tuning.kids_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Kid, Money, Obstacle, Tile};
    use crate::sim::track::TileDecor;

    fn registry_with_tile(z: f32) -> (Registry, EntityId) {
        let mut registry = Registry::new();
        let id = registry.next_entity_id();
        registry.push_tile(Tile {
            id,
            index: 0,
            z,
            decor: TileDecor::default(),
        });
        (registry, id)
    }

    fn add_obstacle(registry: &mut Registry, tile: EntityId, kind: ObstacleKind, lane: i8) -> EntityId {
        let id = registry.next_entity_id();
        registry.obstacles.push(Obstacle {
            id,
            tile,
            kind,
            lane,
            local_z: 0.5,
            hit: false,
        });
        id
    }

    #[test]
    fn test_rules_are_exhaustive_over_kinds() {
        assert!(obstacle_blocks(ObstacleKind::Barrier, 0.0, false));
        assert!(!obstacle_blocks(ObstacleKind::Barrier, 2.0, false));
        assert!(obstacle_blocks(ObstacleKind::Trash, 0.5, false));
        assert!(!obstacle_blocks(ObstacleKind::Trash, 0.8, false));
        assert!(obstacle_blocks(ObstacleKind::Tape, 4.0, false));
        assert!(!obstacle_blocks(ObstacleKind::Tape, -0.5, true));
        assert!(obstacle_blocks(ObstacleKind::Vehicle, 4.0, false));
        assert!(obstacle_blocks(ObstacleKind::Vehicle, -0.5, true));
    }

    #[test]
    fn test_low_obstacle_ends_run_on_ground_not_mid_jump() {
        let (mut registry, tile) = registry_with_tile(0.0);
        let id = add_obstacle(&mut registry, tile, ObstacleKind::Barrier, 0);

        let airborne = Player {
            y: 2.0,
            jumping: true,
            ..Default::default()
        };
        assert_eq!(check_obstacles(&mut registry, &airborne, 2.0), None);

        let grounded = Player::default();
        let hit = check_obstacles(&mut registry, &grounded, 2.0);
        assert_eq!(
            hit,
            Some(ObstacleHit {
                id,
                kind: ObstacleKind::Barrier
            })
        );
        assert!(registry.obstacles[0].hit);
        // Resolved obstacles are not reported twice
        assert_eq!(check_obstacles(&mut registry, &grounded, 2.0), None);
    }

    #[test]
    fn test_tape_needs_slide() {
        let (mut registry, tile) = registry_with_tile(0.0);
        add_obstacle(&mut registry, tile, ObstacleKind::Tape, 0);

        let sliding = Player {
            y: -0.5,
            scale_y: 0.5,
            sliding: true,
            ..Default::default()
        };
        assert!(check_obstacles(&mut registry, &sliding, 2.0).is_none());
        assert!(check_obstacles(&mut registry, &Player::default(), 2.0).is_some());
    }

    #[test]
    fn test_obstacles_filtered_by_lane_and_range() {
        let (mut registry, tile) = registry_with_tile(0.0);
        add_obstacle(&mut registry, tile, ObstacleKind::Vehicle, 1);
        assert!(check_obstacles(&mut registry, &Player::default(), 2.0).is_none());

        let (mut registry, tile) = registry_with_tile(-5.0);
        add_obstacle(&mut registry, tile, ObstacleKind::Vehicle, 0);
        assert!(check_obstacles(&mut registry, &Player::default(), 2.0).is_none());
        // A wider tolerance reaches it
        assert!(check_obstacles(&mut registry, &Player::default(), 5.0).is_some());
    }

    #[test]
    fn test_money_collected_once_and_retired() {
        let tuning = Tuning::default();
        let (mut registry, tile) = registry_with_tile(0.0);
        let id = registry.next_entity_id();
        registry.money.push(Money {
            id,
            tile,
            x: 4.2,
            y: 1.5,
            local_z: 1.0,
            collected: false,
        });

        let wrong_lane = Player::default();
        assert_eq!(check_money(&mut registry, &wrong_lane, &tuning), 0);

        let player = Player {
            lane: 1,
            target_lane: 1,
            x: 4.0,
            ..Default::default()
        };
        assert_eq!(check_money(&mut registry, &player, &tuning), 1);
        assert!(registry.money[0].collected);
        assert_eq!(registry.drain_retired(), vec![EntityRef::Money(id)]);
        assert_eq!(check_money(&mut registry, &player, &tuning), 0);
    }

    #[test]
    fn test_high_money_needs_a_jump() {
        let tuning = Tuning::default();
        let (mut registry, tile) = registry_with_tile(0.0);
        let id = registry.next_entity_id();
        registry.money.push(Money {
            id,
            tile,
            x: 0.0,
            y: 3.5,
            local_z: 0.0,
            collected: false,
        });
        assert_eq!(check_money(&mut registry, &Player::default(), &tuning), 0);
        let jumping = Player {
            y: 2.0,
            jumping: true,
            ..Default::default()
        };
        assert_eq!(check_money(&mut registry, &jumping, &tuning), 1);
    }

    #[test]
    fn test_kids_drift_then_collect() {
        let (mut registry, tile) = registry_with_tile(-8.0);
        let id = registry.next_entity_id();
        registry.kids.push(Kid {
            id,
            tile,
            x: 4.0,
            origin_x: 4.0,
            local_z: 0.0,
            spawn_z: -8.0,
            collected: false,
        });
        let player = Player::default();

        assert_eq!(check_kids(&mut registry, &player, 2.0), 0);
        assert!((registry.kids[0].x - 3.8).abs() < 1e-5);

        // Out of the magnet window nothing moves
        registry.scroll(-5.0);
        assert_eq!(check_kids(&mut registry, &player, 2.0), 0);
        assert!((registry.kids[0].x - 3.8).abs() < 1e-5);

        registry.scroll(13.0);
        registry.kids[0].x = 1.5;
        assert_eq!(check_kids(&mut registry, &player, 2.0), 1);
        assert!(registry.kids[0].collected);
    }

    #[test]
    fn test_kid_pickup_uses_position_before_drift() {
        let (mut registry, tile) = registry_with_tile(0.0);
        let id = registry.next_entity_id();
        registry.kids.push(Kid {
            id,
            tile,
            x: 2.05,
            origin_x: 4.0,
            local_z: 0.0,
            spawn_z: 0.0,
            collected: false,
        });
        let player = Player::default();

        // Drift brings it inside the tolerance, but only next frame counts
        assert_eq!(check_kids(&mut registry, &player, 2.0), 0);
        assert!(registry.kids[0].x < 2.0);
        assert_eq!(check_kids(&mut registry, &player, 2.0), 1);
    }

    #[test]
    fn test_score_formula() {
        let tuning = Tuning::default();
        assert_eq!(score(0.0, 0, 0, &tuning), 0);
        assert_eq!(score(12.39, 3, 2, &tuning), 123 + 300 + 400);
        assert_eq!(score(12.39, 3, 2, &tuning), score(12.39, 3, 2, &tuning));
    }
}
