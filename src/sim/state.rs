//! Game state and core simulation types
//!
//! `GameState` is the session context: every piece of per-run mutable state
//! lives here and is rebuilt wholesale by `reset`.

use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::entities::Registry;
use super::environment::Environment;
use super::player::Player;
use super::pursuer::Pursuer;
use super::track::TrackGenerator;
use crate::consts::VISIBLE_TILES;
use crate::tuning::Tuning;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Ran into an obstacle
    Obstacle,
    /// The pursuer closed the gap
    Caught,
}

/// Flavour lines for a caught outcome
pub const CAUGHT_MESSAGES: [&str; 6] = [
    "You're fired... and arrested!",
    "Justice has been served!",
    "No one escapes the law!",
    "End of the road!",
    "The chase is over!",
    "Caught red-handed!",
];

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Obstacle => "obstacle",
            Outcome::Caught => "caught",
        }
    }

    /// Game-over screen text. `roll` picks among the caught lines.
    pub fn message(&self, roll: usize) -> &'static str {
        match self {
            Outcome::Obstacle => "You tripped! The pursuer caught up!",
            Outcome::Caught => CAUGHT_MESSAGES[roll % CAUGHT_MESSAGES.len()],
        }
    }

    /// Delay before the summary screen appears (catch sequence plays first)
    pub fn reveal_delay_ms(&self) -> f64 {
        match self {
            Outcome::Obstacle => 300.0,
            Outcome::Caught => 1200.0,
        }
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Track laid out, waiting for the player to start
    Ready,
    /// Active gameplay
    Running,
    /// Simulation frozen
    Paused,
    /// Run ended (terminal until reset)
    GameOver(Outcome),
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GamePhase::GameOver(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Body colours for a runner (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub skin: u32,
    pub suit: u32,
    pub pants: u32,
}

/// Selectable runners. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    Runner1,
    Runner2,
    Runner3,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Runner1, Character::Runner2, Character::Runner3];

    /// Identifier used by the character picker (`data-char`)
    pub fn id(&self) -> &'static str {
        match self {
            Character::Runner1 => "runner1",
            Character::Runner2 => "runner2",
            Character::Runner3 => "runner3",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Picker label
    pub fn perk(&self) -> &'static str {
        match self {
            Character::Runner1 => "Speed Bonus",
            Character::Runner2 => "Coin Bonus",
            Character::Runner3 => "Shield Bonus",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Character::Runner1 => Palette {
                skin: 0x4a3020,
                suit: 0x1a1a1a,
                pants: 0x0a0a0a,
            },
            Character::Runner2 => Palette {
                skin: 0xd4a574,
                suit: 0x2a2a4a,
                pants: 0x1a1a2a,
            },
            Character::Runner3 => Palette {
                skin: 0xb8956a,
                suit: 0x3a5a3a,
                pants: 0x2a3a2a,
            },
        }
    }
}

/// Things that happened during a frame, drained by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Session state was torn down and rebuilt
    SessionReset,
    Started,
    Paused,
    Resumed,
    MoneyCollected { count: u32 },
    KidCollected { count: u32 },
    EnvironmentChanged(Environment),
    GameOver {
        outcome: Outcome,
        score: u64,
        distance: f32,
    },
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed (track layout)
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Money tally
    pub money: u32,
    /// Kid tally
    pub kids: u32,
    /// Distance travelled (non-decreasing within a run)
    pub distance: f32,
    /// Track speed in units per nominal frame
    pub speed: f32,
    /// Simulation clock: sum of clamped frame deltas while running
    pub clock_ms: f64,
    pub player: Player,
    pub pursuer: Pursuer,
    pub registry: Registry,
    pub track: TrackGenerator,
    /// Live tunables (distance-driven fields change every frame)
    pub tuning: Tuning,
    pub environment: Environment,
    pub effects: Effects,
    pub character: Character,
    /// Best score across sessions (survives reset)
    pub high_score: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with the track laid out and the pursuer in its intro pose
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_quality(seed, tuning, true)
    }

    pub fn with_quality(seed: u64, mut tuning: Tuning, building_windows: bool) -> Self {
        tuning.reset_progression();
        let mut track = TrackGenerator::new(seed);
        track.building_windows = building_windows;

        let mut state = Self {
            seed,
            phase: GamePhase::Ready,
            score: 0,
            money: 0,
            kids: 0,
            distance: 0.0,
            speed: tuning.initial_speed,
            clock_ms: 0.0,
            player: Player::default(),
            pursuer: Pursuer::intro(),
            registry: Registry::new(),
            track,
            tuning,
            environment: Environment::default(),
            effects: Effects::new(),
            character: Character::default(),
            high_score: 0,
            events: Vec::new(),
        };
        state.fill_track();
        state
    }

    /// Tear down every per-session value and lay out a fresh track.
    /// Character, high score, quality and tunables carry over.
    pub fn reset(&mut self, seed: u64) {
        let mut fresh = Self::with_quality(seed, self.tuning.clone(), self.track.building_windows);
        fresh.character = self.character;
        fresh.high_score = self.high_score;
        *self = fresh;
        self.push_event(GameEvent::SessionReset);
        log::info!("Session reset (seed {})", seed);
    }

    /// Generate tiles until the visible window is full
    pub fn fill_track(&mut self) {
        while self.registry.tiles.len() < VISIBLE_TILES {
            self.track.generate_tile(&mut self.registry, &self.tuning);
        }
    }

    /// Ready → Running
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.phase = GamePhase::Running;
        self.pursuer = Pursuer::new(self.tuning.pursuer_start_z);
        self.push_event(GameEvent::Started);
        log::info!("Run started as {}", self.character.id());
        true
    }

    /// Running ⇄ Paused. No-op in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.push_event(GameEvent::Paused);
                log::info!("Paused at distance {:.0}", self.distance);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.push_event(GameEvent::Resumed);
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    /// Running → GameOver. Only the first outcome of a run is kept.
    pub fn game_over(&mut self, outcome: Outcome) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        self.phase = GamePhase::GameOver(outcome);
        self.high_score = self.high_score.max(self.score);
        self.push_event(GameEvent::GameOver {
            outcome,
            score: self.score,
            distance: self.distance,
        });
        log::info!(
            "Game over ({}): score {}, distance {:.0}, money {}, kids {}",
            outcome.as_str(),
            self.score,
            self.distance,
            self.money,
            self.kids
        );
        true
    }

    /// Pose the runner and pursuer for the catch sequence, `elapsed_ms` after game over
    pub fn apply_catch_pose(&mut self, elapsed_ms: f64) {
        if self.phase.outcome() != Some(Outcome::Caught) {
            return;
        }
        self.pursuer.x = self.player.x;
        if elapsed_ms < 300.0 {
            self.pursuer.z = 3.0;
            self.pursuer.scale = 1.3;
            self.player.y = 0.3;
            self.player.roll = 0.0;
        } else {
            self.pursuer.z = 1.0;
            self.pursuer.scale = 1.5;
            self.player.y = 0.0;
            self.player.roll = 0.3;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_fills_visible_window() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.registry.tiles.len(), VISIBLE_TILES);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.pursuer, Pursuer::intro());
        assert_eq!(state.speed, state.tuning.initial_speed);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut state = GameState::new(1, Tuning::default());
        assert!(!state.toggle_pause());
        assert!(!state.game_over(Outcome::Caught));

        assert!(state.start());
        assert!(!state.start());
        assert_eq!(state.pursuer.z, 11.0);

        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.game_over(Outcome::Obstacle));
        assert!(state.toggle_pause());

        state.score = 420;
        assert!(state.game_over(Outcome::Obstacle));
        assert!(!state.game_over(Outcome::Caught));
        assert_eq!(state.phase.outcome(), Some(Outcome::Obstacle));
        assert_eq!(state.high_score, 420);

        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::Started));
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                outcome: Outcome::Obstacle,
                score: 420,
                ..
            })
        ));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_reset_keeps_identity_but_not_progress() {
        let mut state = GameState::with_quality(5, Tuning::default(), false);
        state.character = Character::Runner3;
        state.start();
        state.score = 900;
        state.money = 4;
        state.distance = 77.0;
        state.game_over(Outcome::Caught);

        state.reset(6);
        assert_eq!(state.seed, 6);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.character, Character::Runner3);
        assert_eq!(state.high_score, 900);
        assert!(!state.track.building_windows);
        assert_eq!((state.score, state.money, state.distance), (0, 0, 0.0));
        assert_eq!(state.drain_events(), vec![GameEvent::SessionReset]);
    }

    #[test]
    fn test_caught_messages() {
        assert_eq!(Outcome::Caught.message(1), CAUGHT_MESSAGES[1]);
        assert_eq!(Outcome::Caught.message(7), CAUGHT_MESSAGES[1]);
        assert!(Outcome::Obstacle.message(3).starts_with("You tripped"));
    }

    #[test]
    fn test_character_ids_round_trip() {
        for character in Character::ALL {
            assert_eq!(Character::from_id(character.id()), Some(character));
        }
        assert_eq!(Character::from_id("nobody"), None);
    }

    #[test]
    fn test_catch_pose_only_after_caught() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        state.apply_catch_pose(0.0);
        assert_eq!(state.pursuer.z, 11.0);

        state.game_over(Outcome::Caught);
        state.apply_catch_pose(100.0);
        assert_eq!(state.pursuer.z, 3.0);
        state.apply_catch_pose(400.0);
        assert_eq!(state.pursuer.scale, 1.5);
    }
}
