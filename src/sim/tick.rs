//! Per-frame simulation tick
//!
//! Advances one session by one clamped frame delta, in a fixed order:
//! actions, progression, movement, environment, player, pursuer,
//! obstacle check, catch check, pickups, track upkeep, score.

use super::collision::{self, ObstacleHit};
use super::effects::EffectKind;
use super::entities::ObstacleKind;
use super::environment::Environment;
use super::state::{GameEvent, GamePhase, GameState, Outcome};
use crate::consts::{MAX_LANE, MIN_LANE, PLAYER_Z};
use crate::lane_x;
use crate::platform::FrameDelta;

/// Input commands for a single frame (edge-triggered)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub lane_left: bool,
    pub lane_right: bool,
    pub jump: bool,
    pub slide: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, delta: FrameDelta) {
    if input.pause {
        state.toggle_pause();
    }

    // Nothing moves unless running
    if state.phase != GamePhase::Running {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    // Actions start at the pre-advance clock
    let now = state.clock_ms;
    if input.lane_left {
        state.player.try_change_lane(-1, now);
    }
    if input.lane_right {
        state.player.try_change_lane(1, now);
    }
    if input.jump {
        state.player.try_jump(now);
    }
    if input.slide {
        state.player.try_slide(now);
    }

    state.clock_ms += delta.ms;
    let now = state.clock_ms;

    // Difficulty follows distance
    state.tuning.apply_progression(state.distance);
    state.speed = (state.speed + state.tuning.speed_increase * delta.ratio)
        .min(state.tuning.max_speed)
        .max(state.tuning.initial_speed);

    // Scroll the world toward the player
    let move_amount = state.speed * delta.ratio;
    state.registry.scroll(move_amount);
    state.track.scroll(move_amount);
    state
        .pursuer
        .advance(move_amount, state.tuning.pursuer_speed_multiplier);
    state.distance += move_amount * state.tuning.distance_multiplier;

    update_environment(state, now);

    state.player.update(now, &state.tuning);
    // Follows the committed lane, not the eased position
    state.pursuer.track(lane_x(state.player.lane, state.tuning.lane_width));
    state.pursuer.update_pose(now);

    // Obstacles first, then the pursuer; first hit wins
    let tolerance = state.tuning.collision_tolerance;
    if let Some(ObstacleHit { kind, .. }) =
        collision::check_obstacles(&mut state.registry, &state.player, tolerance)
    {
        log::debug!("Hit {} in lane {}", kind.as_str(), state.player.lane);
        recompute_score(state);
        state.game_over(Outcome::Obstacle);
        return;
    }
    if state.pursuer.has_caught(state.tuning.pursuer_catch_distance) {
        recompute_score(state);
        state.game_over(Outcome::Caught);
        return;
    }

    let pickups = collision::check_pickups(&mut state.registry, &state.player, &state.tuning);
    if pickups.money > 0 {
        state.money += pickups.money;
        state.effects.start(EffectKind::MoneyPulse, now);
        state.push_event(GameEvent::MoneyCollected {
            count: pickups.money,
        });
    }
    if pickups.kids > 0 {
        state.kids += pickups.kids;
        state.effects.start(EffectKind::KidPulse, now);
        state.push_event(GameEvent::KidCollected { count: pickups.kids });
    }

    // Keep the visible window full
    if state.registry.prune() > 0 {
        state.fill_track();
    }

    recompute_score(state);
    state.effects.expire(now);
}

fn recompute_score(state: &mut GameState) {
    state.score = collision::score(state.distance, state.money, state.kids, &state.tuning);
}

/// Switch theme when distance crosses into a new bracket
fn update_environment(state: &mut GameState, now: f64) {
    let environment = Environment::for_distance(state.distance);
    if environment == state.environment {
        return;
    }
    state.environment = environment;
    state.effects.start(EffectKind::EnvironmentBanner, now);
    state.push_event(GameEvent::EnvironmentChanged(environment));
    log::info!(
        "Entering {} at distance {:.0}",
        environment.name(),
        state.distance
    );
}

/// Frames of lead time the demo AI gives each response
const JUMP_LEAD_FRAMES: f32 = 4.0;
const DODGE_LEAD_FRAMES: f32 = 20.0;

/// Demo AI: dodge vehicles, jump low obstacles, slide under tape
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let tolerance = state.tuning.collision_tolerance;
    let lookahead = tolerance + state.speed * DODGE_LEAD_FRAMES;

    // Nearest unresolved obstacle ahead in a lane, as (distance ahead, kind)
    let nearest_in = |lane: i8| {
        state
            .registry
            .obstacles
            .iter()
            .filter(|o| !o.hit && o.lane == lane)
            .filter_map(|o| {
                let ahead = PLAYER_Z - state.registry.world_z(o.tile, o.local_z)?;
                (ahead > -tolerance && ahead < lookahead).then_some((ahead, o.kind))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    };

    let threats = [player.lane, player.target_lane]
        .into_iter()
        .filter_map(nearest_in)
        .min_by(|a, b| a.0.total_cmp(&b.0));
    let Some((ahead, kind)) = threats else {
        return;
    };

    let react_within = tolerance + state.speed * JUMP_LEAD_FRAMES;
    match kind {
        ObstacleKind::Barrier | ObstacleKind::Trash => {
            if ahead <= react_within {
                input.jump = true;
            }
        }
        ObstacleKind::Tape => {
            if ahead <= react_within {
                input.slide = true;
            }
        }
        ObstacleKind::Vehicle => {
            if player.is_changing_lane() {
                return;
            }
            let free = [player.lane - 1, player.lane + 1]
                .into_iter()
                .filter(|lane| (MIN_LANE..=MAX_LANE).contains(lane))
                .find(|&lane| nearest_in(lane).is_none())
                .or_else(|| {
                    [player.lane - 1, player.lane + 1]
                        .into_iter()
                        .find(|lane| (MIN_LANE..=MAX_LANE).contains(lane))
                });
            match free {
                Some(lane) if lane < player.lane => input.lane_left = true,
                Some(_) => input.lane_right = true,
                None => {}
            }
        }
    }
}
