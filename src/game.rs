//! Session orchestration
//!
//! `Game` owns one `GameState` plus everything that outlives a session:
//! the leaderboard, settings, the storage backend and the frame clock.
//! The host calls `frame` once per display refresh with a timestamp and
//! its render and HUD sinks.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::HighScores;
use crate::persistence::KeyValueStore;
use crate::platform::{Action, FrameClock};
use crate::renderer::{self, RenderSink};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{Character, GameEvent, GamePhase, GameState, Outcome, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{HudSink, HudSnapshot, RunSummary};

/// Game-over bookkeeping for the summary screen
#[derive(Debug, Clone)]
struct PendingSummary {
    at_ms: f64,
    summary: RunSummary,
    shown: bool,
}

pub struct Game {
    pub state: GameState,
    pub high_scores: HighScores,
    pub settings: Settings,
    store: Box<dyn KeyValueStore>,
    clock: FrameClock,
    /// One-shot inputs queued since the last frame
    input: TickInput,
    /// Seeds each new session
    seeder: Pcg32,
    pending: Option<PendingSummary>,
    /// Character and environment must be pushed on the next frame
    scene_dirty: bool,
}

impl Game {
    /// Load persisted data and lay out the first session
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let settings = Settings::load(store.as_ref());
        let high_scores = HighScores::load(store.as_ref());
        let best = HighScores::load_best(store.as_ref()).max(high_scores.top_score().unwrap_or(0));

        let mut seeder = Pcg32::seed_from_u64(seed);
        let mut state =
            GameState::with_quality(seeder.random(), tuning, settings.quality.building_windows());
        state.character = settings.character;
        state.high_score = best;

        log::info!(
            "Game ready: {} quality, best score {}, {} leaderboard entries",
            settings.quality.as_str(),
            best,
            high_scores.entries.len()
        );

        Self {
            state,
            high_scores,
            settings,
            store,
            clock: FrameClock::new(),
            input: TickInput::default(),
            seeder,
            pending: None,
            scene_dirty: true,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Pick a runner. Only allowed before a run starts.
    pub fn select_character(&mut self, character: Character) -> bool {
        if self.state.phase != GamePhase::Ready {
            return false;
        }
        self.state.character = character;
        self.settings.character = character;
        self.settings.save(self.store.as_mut());
        self.scene_dirty = true;
        true
    }

    /// Change quality; affects tiles generated from now on
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.settings.quality = quality;
        self.state.track.building_windows = quality.building_windows();
        self.settings.save(self.store.as_mut());
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.state.track.building_windows = settings.quality.building_windows();
        self.settings = settings;
        self.settings.save(self.store.as_mut());
    }

    /// Begin the laid-out session
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !self.state.start() {
            return false;
        }
        self.clock.reset(now_ms);
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
        true
    }

    /// Tear the current session down and run a fresh one
    pub fn restart(&mut self, now_ms: f64) {
        let seed = self.seeder.random();
        self.state.reset(seed);
        self.pending = None;
        self.scene_dirty = true;
        self.start(now_ms);
    }

    /// Back to the start screen with a fresh track
    pub fn return_to_menu(&mut self) {
        let seed = self.seeder.random();
        self.state.reset(seed);
        self.pending = None;
        self.scene_dirty = true;
    }

    /// Queue a player action. Ignored unless a run is in progress.
    pub fn handle_action(&mut self, action: Action) {
        match (action, self.state.phase) {
            (Action::Pause, GamePhase::Running | GamePhase::Paused) => self.input.pause = true,
            (_, GamePhase::Running) => match action {
                Action::LaneLeft => self.input.lane_left = true,
                Action::LaneRight => self.input.lane_right = true,
                Action::Jump => self.input.jump = true,
                Action::Slide => self.input.slide = true,
                Action::Pause => {}
            },
            _ => {}
        }
    }

    /// Let the demo AI drive
    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    pub fn idle_mode(&self) -> bool {
        self.input.idle_mode
    }

    /// Pause if running (tab hidden, window blurred)
    pub fn auto_pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.toggle_pause();
        }
    }

    /// Wipe the leaderboard (the best score scalar stays)
    pub fn clear_scores(&mut self) {
        self.high_scores.clear();
        HighScores::clear_saved(self.store.as_mut());
        log::info!("Leaderboard cleared");
    }

    /// Advance one display frame
    pub fn frame(&mut self, now_ms: f64, renderer: &mut dyn RenderSink, hud: &mut dyn HudSink) {
        let delta = self.clock.advance(now_ms);
        let idle_mode = self.input.idle_mode;
        let input = std::mem::replace(
            &mut self.input,
            TickInput {
                idle_mode,
                ..Default::default()
            },
        );
        tick(&mut self.state, &input, delta);

        for event in self.state.drain_events() {
            self.handle_event(event, now_ms, renderer, hud);
        }

        if self.scene_dirty {
            renderer.set_character(self.state.character);
            renderer.set_environment(self.state.environment);
            self.scene_dirty = false;
        }

        if let Some(pending) = &self.pending {
            self.state.apply_catch_pose(now_ms - pending.at_ms);
        }
        renderer::push_frame(&mut self.state, renderer, now_ms);
        hud.update(&HudSnapshot::capture(&self.state));

        if let Some(pending) = &mut self.pending {
            let delay = pending.summary.outcome.reveal_delay_ms();
            if !pending.shown && now_ms - pending.at_ms >= delay {
                hud.show_game_over(&pending.summary);
                pending.shown = true;
            }
        }
    }

    fn handle_event(
        &mut self,
        event: GameEvent,
        now_ms: f64,
        renderer: &mut dyn RenderSink,
        hud: &mut dyn HudSink,
    ) {
        match event {
            GameEvent::SessionReset => {
                renderer.clear_scene();
                hud.hide_game_over();
            }
            GameEvent::EnvironmentChanged(environment) => {
                renderer.set_environment(environment);
                hud.notify(environment.name());
            }
            GameEvent::GameOver {
                outcome,
                score,
                distance,
            } => {
                let summary = self.record_result(outcome, score, distance);
                self.pending = Some(PendingSummary {
                    at_ms: now_ms,
                    summary,
                    shown: false,
                });
            }
            GameEvent::Started
            | GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::MoneyCollected { .. }
            | GameEvent::KidCollected { .. } => {
                log::trace!("{:?}", event);
            }
        }
    }

    /// Persist a finished run and build its summary
    fn record_result(&mut self, outcome: Outcome, score: u64, distance: f32) -> RunSummary {
        let rank = self.high_scores.add_score(score, distance);
        self.high_scores.save(self.store.as_mut());

        let best = HighScores::load_best(self.store.as_ref());
        if score > best {
            HighScores::save_best(self.store.as_mut(), score);
            log::info!("New best score: {}", score);
        }

        let roll = self.seeder.random_range(0..usize::MAX);
        RunSummary {
            outcome,
            message: outcome.message(roll),
            distance: distance.max(0.0).floor() as u32,
            money: self.state.money,
            kids: self.state.kids,
            score,
            high_score: self.state.high_score.max(best),
            rank,
        }
    }

    /// Summary of the last finished run, once it has been revealed
    pub fn summary(&self) -> Option<&RunSummary> {
        self.pending.as_ref().filter(|p| p.shown).map(|p| &p.summary)
    }
}
