//! Per-entity transforms
//!
//! Meshes are built around their own origin on the road surface, so most
//! entities only need a translation. Money and kids carry an idle animation.

use glam::{Quat, Vec3};

use super::Transform;
use crate::consts::PLAYER_Z;
use crate::lane_x;
use crate::sim::entities::{Kid, Money, Obstacle, Tile};
use crate::sim::track::KID_BASE_HEIGHT;
use crate::sim::{Player, Pursuer};

/// Kid bounce amplitude
const KID_BOUNCE: f32 = 0.2;

pub fn tile(tile: &Tile) -> Transform {
    Transform::from_translation(Vec3::new(0.0, 0.0, tile.z))
}

pub fn obstacle(obstacle: &Obstacle, world_z: f32, lane_width: f32) -> Transform {
    Transform::from_translation(Vec3::new(lane_x(obstacle.lane, lane_width), 0.0, world_z))
}

/// Spinning bill with a slight wobble
pub fn money(money: &Money, world_z: f32, now_ms: f64) -> Transform {
    let spin = (now_ms * 0.003) as f32;
    let wobble = ((now_ms * 0.002).sin() * 0.1) as f32;
    Transform {
        translation: Vec3::new(money.x, money.y, world_z),
        rotation: Quat::from_rotation_y(spin) * Quat::from_rotation_x(wobble),
        scale: Vec3::ONE,
    }
}

/// Kids bounce out of phase with each other (phase from spawn position)
pub fn kid(kid: &Kid, world_z: f32, now_ms: f64) -> Transform {
    let bounce = ((now_ms * 0.005) as f32 + kid.spawn_z).sin() * KID_BOUNCE;
    Transform::from_translation(Vec3::new(kid.x, KID_BASE_HEIGHT + bounce, world_z))
}

pub fn player(player: &Player) -> Transform {
    Transform {
        translation: Vec3::new(player.x, player.y, PLAYER_Z),
        rotation: Quat::from_rotation_z(player.roll),
        scale: Vec3::new(1.0, player.scale_y, 1.0),
    }
}

pub fn pursuer(pursuer: &Pursuer) -> Transform {
    Transform {
        translation: Vec3::new(pursuer.x, pursuer.y, pursuer.z),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(pursuer.scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_player_is_squashed() {
        let sliding = Player {
            y: -0.5,
            scale_y: 0.5,
            sliding: true,
            ..Default::default()
        };
        let t = player(&sliding);
        assert_eq!(t.scale, Vec3::new(1.0, 0.5, 1.0));
        assert_eq!(t.translation.y, -0.5);
    }

    #[test]
    fn test_kid_bounce_stays_near_base() {
        let k = Kid {
            id: 1,
            tile: 1,
            x: 4.0,
            origin_x: 4.0,
            local_z: 0.0,
            spawn_z: -70.0,
            collected: false,
        };
        for t in [0.0, 120.0, 999.0, 5000.0] {
            let y = kid(&k, -20.0, t).translation.y;
            assert!((KID_BASE_HEIGHT - KID_BOUNCE..=KID_BASE_HEIGHT + KID_BOUNCE).contains(&y));
        }
    }

    #[test]
    fn test_pursuer_scale_is_uniform() {
        let mut p = Pursuer::new(5.0);
        p.update_pose(0.0);
        let t = pursuer(&p);
        assert_eq!(t.scale, Vec3::splat(p.scale));
        assert_eq!(t.translation.z, 5.0);
    }
}
