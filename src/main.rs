//! City Runner entry point
//!
//! On the web: wires the DOM, keyboard and the page's 3D scene to a `Game`
//! and drives it from `requestAnimationFrame`. Natively: runs a headless
//! demo with the autopilot at the controls.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

    use city_runner::persistence::LocalStorage;
    use city_runner::platform::action_for_key;
    use city_runner::renderer::{RenderSink, RenderTarget, Spawn, Transform};
    use city_runner::sim::{Character, EntityRef, Environment};
    use city_runner::ui::{HudSink, HudSnapshot, RunSummary};
    use city_runner::{Game, QualityPreset, Tuning};

    // Bridge to the page's scene (`window.cityRunnerScene`)
    #[wasm_bindgen(inline_js = "
        function scene() { return window.cityRunnerScene; }
        export function scene_spawn(kind, id, variant, data) {
            const s = scene(); if (s) s.spawn(kind, id, variant, data);
        }
        export function scene_despawn(kind, id) {
            const s = scene(); if (s) s.despawn(kind, id);
        }
        export function scene_set_transform(kind, id, values) {
            const s = scene(); if (s) s.setTransform(kind, id, values);
        }
        export function scene_set_environment(ambient, fog) {
            const s = scene(); if (s) s.setEnvironment(ambient, fog);
        }
        export function scene_set_character(id, skin, suit, pants) {
            const s = scene(); if (s) s.setCharacter(id, skin, suit, pants);
        }
        export function scene_clear() {
            const s = scene(); if (s) s.clear();
        }
        export function scene_render() {
            const s = scene(); if (s) s.render();
        }
    ")]
    extern "C" {
        fn scene_spawn(kind: &str, id: u32, variant: &str, data: &[f32]);
        fn scene_despawn(kind: &str, id: u32);
        fn scene_set_transform(kind: &str, id: u32, values: &[f32]);
        fn scene_set_environment(ambient: u32, fog: u32);
        fn scene_set_character(id: &str, skin: u32, suit: u32, pants: u32);
        fn scene_clear();
        fn scene_render();
    }

    fn entity_key(entity: EntityRef) -> (&'static str, u32) {
        match entity {
            EntityRef::Tile(id) => ("tile", id),
            EntityRef::Obstacle(id) => ("obstacle", id),
            EntityRef::Money(id) => ("money", id),
            EntityRef::Kid(id) => ("kid", id),
        }
    }

    /// Forwards scene updates to the page
    struct JsRenderer {
        street_light_glow: bool,
    }

    impl RenderSink for JsRenderer {
        fn spawn(&mut self, spawn: Spawn<'_>) {
            let (kind, id) = entity_key(spawn.entity());
            match spawn {
                Spawn::Tile(tile) => {
                    // Decor travels as JSON; the glow flag rides along as data
                    let decor = serde_json::to_string(&tile.decor).unwrap_or_default();
                    let glow = if self.street_light_glow { 1.0 } else { 0.0 };
                    scene_spawn(kind, id, &decor, &[tile.z, glow]);
                }
                Spawn::Obstacle(o) => scene_spawn(kind, id, o.kind.as_str(), &[o.kind.height()]),
                Spawn::Money(m) => scene_spawn(kind, id, "money", &[m.x, m.y]),
                Spawn::Kid(k) => scene_spawn(kind, id, "kid", &[k.x]),
            }
        }

        fn despawn(&mut self, entity: EntityRef) {
            let (kind, id) = entity_key(entity);
            scene_despawn(kind, id);
        }

        fn set_transform(&mut self, target: RenderTarget, transform: Transform) {
            let (kind, id) = match target {
                RenderTarget::Player => ("player", 0),
                RenderTarget::Pursuer => ("pursuer", 0),
                RenderTarget::Entity(entity) => entity_key(entity),
            };
            let t = transform.translation;
            let r = transform.rotation;
            let s = transform.scale;
            scene_set_transform(kind, id, &[t.x, t.y, t.z, r.x, r.y, r.z, r.w, s.x, s.y, s.z]);
        }

        fn set_environment(&mut self, environment: Environment) {
            scene_set_environment(environment.ambient_color(), environment.fog_color());
        }

        fn set_character(&mut self, character: Character) {
            let palette = character.palette();
            scene_set_character(character.id(), palette.skin, palette.suit, palette.pants);
        }

        fn clear_scene(&mut self) {
            scene_clear();
        }

        fn render(&mut self) {
            scene_render();
        }
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }

    /// HUD written straight into the page
    struct DomHud {
        document: Document,
    }

    impl HudSink for DomHud {
        fn update(&mut self, hud: &HudSnapshot) {
            let d = &self.document;
            set_text(d, "coin-count", &hud.money.to_string());
            set_text(d, "kids-count", &hud.kids.to_string());
            set_text(d, "distance", &format!("{}m", hud.distance));
            set_text(d, "score", &hud.score.to_string());
            set_text(d, "chaser-dist", &hud.pursuer_distance.to_string());
            set_style(d, "danger-fill", "width", &format!("{}%", hud.danger_percent));
            let flash = if hud.danger_flash {
                "introFlash 0.3s ease-in-out infinite alternate"
            } else {
                "none"
            };
            set_style(d, "chaser-distance", "animation", flash);
            set_style(d, "coin-count", "transform", &format!("scale({})", hud.money_scale));
            set_style(d, "kids-count", "transform", &format!("scale({})", hud.kid_scale));
            set_hidden(d, "pause-indicator", !hud.paused);
            match hud.banner {
                Some((name, opacity)) => {
                    set_text(d, "zone-banner", name);
                    set_style(d, "zone-banner", "opacity", &opacity.to_string());
                    set_hidden(d, "zone-banner", false);
                }
                None => set_hidden(d, "zone-banner", true),
            }
        }

        fn notify(&mut self, message: &str) {
            log::info!("Now entering {}", message);
        }

        fn show_game_over(&mut self, summary: &RunSummary) {
            let d = &self.document;
            set_text(d, "final-distance", &summary.distance.to_string());
            set_text(d, "final-coins", &summary.money.to_string());
            set_text(d, "final-kids", &summary.kids.to_string());
            set_text(d, "final-score", &summary.score.to_string());
            set_text(d, "high-score", &summary.high_score.to_string());
            set_text(d, "caught-text", summary.message);
            set_hidden(d, "gameover-screen", false);
        }

        fn hide_game_over(&mut self) {
            set_hidden(&self.document, "gameover-screen", true);
        }
    }

    /// Game plus its page-side sinks
    struct App {
        game: Game,
        renderer: JsRenderer,
        hud: DomHud,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.game.frame(time, &mut self.renderer, &mut self.hud);

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                self.fps = (60000.0 / (time - oldest)).round() as u32;
            }
            if self.game.settings.show_fps {
                set_text(&self.hud.document, "fps-counter", &self.fps.to_string());
            }
        }

        fn refresh_leaderboard(&self) {
            let d = &self.hud.document;
            let entries = &self.game.high_scores.entries;
            for i in 0..city_runner::highscores::MAX_HIGH_SCORES {
                let (score, distance) = match entries.get(i) {
                    Some(e) => (e.score.to_string(), format!("{}m", e.distance.floor())),
                    None => ("---".to_string(), "---".to_string()),
                };
                set_text(d, &format!("lb-score-{}", i + 1), &score);
                set_text(d, &format!("lb-dist-{}", i + 1), &distance);
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {}", e).into());
        }

        log::info!("City Runner starting...");

        let Some(document) = page_document() else {
            log::error!("No document to attach to");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::play(), Box::new(LocalStorage));
        let renderer = JsRenderer {
            street_light_glow: game.settings.quality.street_light_glow(),
        };
        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            hud: DomHud {
                document: document.clone(),
            },
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        app.borrow().refresh_leaderboard();
        setup_keyboard(app.clone());
        setup_character_buttons(&document, app.clone());
        setup_game_over_buttons(&document, app.clone());
        setup_settings(&document, app.clone());
        setup_auto_pause(&document, app.clone());

        request_animation_frame(app);
        log::info!("City Runner running!");
    }

    fn on_click(element: &Element, handler: impl FnMut(MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn each_selected(document: &Document, selector: &str, mut f: impl FnMut(Element)) {
        let Ok(nodes) = document.query_selector_all(selector) else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                f(el);
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Edge-triggered: held keys do not repeat actions
            if event.repeat() {
                return;
            }
            let mut app = app.borrow_mut();
            if event.code() == "KeyI" {
                let idle = !app.game.idle_mode();
                app.game.set_idle_mode(idle);
                log::info!("Idle mode: {}", idle);
                return;
            }
            if let Some(action) = action_for_key(&event.code()) {
                event.prevent_default();
                app.game.handle_action(action);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_character_buttons(document: &Document, app: Rc<RefCell<App>>) {
        each_selected(document, ".char-btn", |btn| {
            let app = app.clone();
            let id = btn.get_attribute("data-char").unwrap_or_default();
            on_click(&btn, move |_| {
                let mut app = app.borrow_mut();
                if let Some(character) = Character::from_id(&id) {
                    app.game.select_character(character);
                }
                if app.game.start(now()) {
                    if let Some(document) = page_document() {
                        set_hidden(&document, "start-screen", true);
                    }
                }
            });
        });
    }

    fn setup_game_over_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let app = app.clone();
            on_click(&btn, move |_| {
                app.borrow_mut().game.restart(now());
            });
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let app = app.clone();
            on_click(&btn, move |_| {
                let mut app = app.borrow_mut();
                app.game.return_to_menu();
                app.refresh_leaderboard();
                if let Some(document) = page_document() {
                    set_hidden(&document, "gameover-screen", true);
                    set_hidden(&document, "start-screen", false);
                }
            });
        }

        if let Some(btn) = document.get_element_by_id("clear-scores-btn") {
            on_click(&btn, move |_| {
                let mut app = app.borrow_mut();
                app.game.clear_scores();
                app.refresh_leaderboard();
            });
        }
    }

    fn setup_settings(document: &Document, app: Rc<RefCell<App>>) {
        each_selected(document, ".option-btn[data-quality]", |btn| {
            let app = app.clone();
            let value = btn.get_attribute("data-quality").unwrap_or_default();
            on_click(&btn, move |_| {
                if let Some(quality) = QualityPreset::parse(&value) {
                    let mut app = app.borrow_mut();
                    app.game.set_quality(quality);
                    app.renderer.street_light_glow = quality.street_light_glow();
                }
            });
        });

        each_selected(document, ".toggle-btn[data-setting]", |btn| {
            let app = app.clone();
            let setting = btn.get_attribute("data-setting").unwrap_or_default();
            let target = btn.clone();
            on_click(&btn, move |_| {
                let mut app = app.borrow_mut();
                let mut settings = app.game.settings.clone();
                let flag = match setting.as_str() {
                    "sound" => &mut settings.sound_effects,
                    "music" => &mut settings.music,
                    "fps" => &mut settings.show_fps,
                    _ => return,
                };
                *flag = !*flag;
                target.set_text_content(Some(if *flag { "ON" } else { "OFF" }));
                app.game.update_settings(settings);
            });
        });
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().game.auto_pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.auto_pause();
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("City Runner (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    headless::run_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use city_runner::persistence::MemoryStore;
    use city_runner::renderer::NullRenderer;
    use city_runner::ui::{HudSink, HudSnapshot, RunSummary};
    use city_runner::{Game, Tuning};

    /// Demo length in frames (one minute at 60 fps)
    const DEMO_FRAMES: usize = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Logs notable HUD changes
    #[derive(Default)]
    struct LogHud {
        last_distance: u32,
        summary: Option<RunSummary>,
    }

    impl HudSink for LogHud {
        fn update(&mut self, hud: &HudSnapshot) {
            if hud.distance / 250 > self.last_distance / 250 {
                log::info!(
                    "{}m - score {}, money {}, kids {}, pursuer {}",
                    hud.distance,
                    hud.score,
                    hud.money,
                    hud.kids,
                    hud.pursuer_distance
                );
            }
            self.last_distance = hud.distance;
        }

        fn notify(&mut self, message: &str) {
            log::info!("Now entering {}", message);
        }

        fn show_game_over(&mut self, summary: &RunSummary) {
            self.summary = Some(summary.clone());
        }
    }

    pub fn run_demo() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut game = Game::new(seed, Tuning::play(), Box::new(MemoryStore::new()));
        let mut renderer = NullRenderer::default();
        let mut hud = LogHud::default();

        game.set_idle_mode(true);
        game.start(0.0);

        let mut now = 0.0;
        for _ in 0..DEMO_FRAMES {
            now += FRAME_MS;
            game.frame(now, &mut renderer, &mut hud);
            if hud.summary.is_some() {
                break;
            }
        }

        match hud.summary {
            Some(summary) => println!(
                "Run over ({}): {} - {}m, {} money, {} kids, score {}",
                summary.outcome.as_str(),
                summary.message,
                summary.distance,
                summary.money,
                summary.kids,
                summary.score
            ),
            None => println!(
                "Demo finished still running: {:.0}m, score {}",
                game.state.distance, game.state.score
            ),
        }
        println!("Rendered {} frames", renderer.frames);
    }
}
