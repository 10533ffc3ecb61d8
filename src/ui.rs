//! HUD seam
//!
//! The core produces a `HudSnapshot` every frame plus one-shot
//! notifications; a `HudSink` decides how to show them.

use crate::consts::DANGER_RANGE;
use crate::sim::{EffectKind, GamePhase, GameState, Outcome};

/// Danger meter shows a pulse animation above this fill
pub const DANGER_FLASH_PERCENT: f32 = 70.0;

/// Danger meter fill (0-100) for a pursuer gap
pub fn danger_percent(pursuer_z: f32) -> f32 {
    ((DANGER_RANGE - pursuer_z) / DANGER_RANGE * 100.0).clamp(0.0, 100.0)
}

/// Everything the HUD shows during a run
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub money: u32,
    pub kids: u32,
    /// Whole units travelled
    pub distance: u32,
    pub score: u64,
    /// Whole units between pursuer and player
    pub pursuer_distance: u32,
    pub danger_percent: f32,
    /// Pursuer readout should flash
    pub danger_flash: bool,
    /// Counter scales for the collection pulses
    pub money_scale: f32,
    pub kid_scale: f32,
    /// Environment banner text and its opacity, while showing
    pub banner: Option<(&'static str, f32)>,
    pub paused: bool,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock_ms;
        let danger = danger_percent(state.pursuer.z);
        let banner = state
            .effects
            .is_active(EffectKind::EnvironmentBanner, now)
            .then(|| {
                (
                    state.environment.name(),
                    state.effects.fade(EffectKind::EnvironmentBanner, now),
                )
            });
        Self {
            money: state.money,
            kids: state.kids,
            distance: state.distance.max(0.0).floor() as u32,
            score: state.score,
            pursuer_distance: state.pursuer.display_distance(),
            danger_percent: danger,
            danger_flash: danger > DANGER_FLASH_PERCENT,
            money_scale: state.effects.scale(EffectKind::MoneyPulse, now),
            kid_scale: state.effects.scale(EffectKind::KidPulse, now),
            banner,
            paused: state.phase == GamePhase::Paused,
        }
    }
}

/// Final tallies for the game-over screen
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub message: &'static str,
    pub distance: u32,
    pub money: u32,
    pub kids: u32,
    pub score: u64,
    pub high_score: u64,
    /// Leaderboard position (1-based) if the run made the top five
    pub rank: Option<usize>,
}

/// Receiver of HUD updates
pub trait HudSink {
    fn update(&mut self, snapshot: &HudSnapshot);

    /// One-shot notification (environment name)
    fn notify(&mut self, _message: &str) {}

    fn show_game_over(&mut self, _summary: &RunSummary) {}

    fn hide_game_over(&mut self) {}
}

/// HUD that shows nothing
#[derive(Debug, Default)]
pub struct NullHud;

impl HudSink for NullHud {
    fn update(&mut self, _snapshot: &HudSnapshot) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_danger_percent_clamps() {
        assert_eq!(danger_percent(15.0), 0.0);
        assert_eq!(danger_percent(30.0), 0.0);
        assert_eq!(danger_percent(0.0), 100.0);
        assert_eq!(danger_percent(-2.0), 100.0);
        assert!((danger_percent(7.5) - 50.0).abs() < 1e-4);
        assert!((danger_percent(11.0) - 26.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(4, Tuning::default());
        state.start();
        state.money = 3;
        state.kids = 1;
        state.distance = 42.9;
        state.score = 829;
        state.clock_ms = 1000.0;
        state.effects.start(EffectKind::MoneyPulse, 950.0);

        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.distance, 42);
        assert_eq!(hud.pursuer_distance, 11);
        assert_eq!(hud.money_scale, 1.2);
        assert_eq!(hud.kid_scale, 1.0);
        assert!(!hud.danger_flash);
        assert_eq!(hud.banner, None);
        assert!(!hud.paused);

        state.pursuer.z = 3.5;
        assert!(HudSnapshot::capture(&state).danger_flash);
    }
}
