//! Reaction Zone entry point
//!
//! On the web, wires DOM events into the session and runs the frame loop.
//! Natively, runs a headless autopilot session and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use reaction_zone::sim::GameEvent;

/// Log a session event the same way on every platform
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameStarted => log::info!("Game started"),
        GameEvent::GhostReplayStarted { time_ms } => log::info!("Ghost replay ({}ms)", time_ms),
        GameEvent::TargetShown { position, size } => {
            log::debug!("Target at ({}, {}) size {}", position.x, position.y, size)
        }
        GameEvent::Hit {
            reaction_ms,
            points,
        } => log::info!("Hit in {}ms for {} points", reaction_ms, points),
        GameEvent::Miss { distance } => log::info!("Miss by {:.1}px", distance),
        GameEvent::TooEarly => log::info!("Too early!"),
        GameEvent::TimedOut { lives_left } => log::info!("Timed out, lives left: {:?}", lives_left),
        GameEvent::LevelUp { level } => log::info!("Level up -> {}", level),
        GameEvent::GameOver { score, level } => {
            log::info!("Game over with {} points at level {}", score, level)
        }
        GameEvent::TutorialAdvanced { step } => log::debug!("Tutorial step {}", step),
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent};

    use reaction_zone::sim::{Click, GamePhase, Session, TickInput, tick};
    use reaction_zone::{Tuning, Variant};

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: TickInput,
        autoplay: bool,
    }

    impl Game {
        fn new(variant: Variant, seed: u64) -> Self {
            let rules = Tuning::default().rules(variant).clone();
            Self {
                session: Session::new(variant, rules, seed),
                input: TickInput::default(),
                autoplay: false,
            }
        }

        /// Run one frame with the inputs queued since the last one
        fn update(&mut self, now_ms: u64) {
            let mut input = std::mem::take(&mut self.input);
            input.autoplay = self.autoplay;
            tick(&mut self.session, &input, now_ms);
            self.flush_events();
        }

        /// Clicks are applied right away so reaction times are not rounded to frames
        fn handle_click(&mut self, now_ms: u64, click: Click) {
            let input = TickInput {
                click: Some(click),
                ..Default::default()
            };
            tick(&mut self.session, &input, now_ms);
            self.flush_events();
        }

        fn flush_events(&mut self) {
            for event in self.session.drain_events() {
                super::log_event(&event);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;

            set_text(&document, "hud-score", &state.score.to_string());
            set_text(&document, "hud-level", &state.level.to_string());
            set_text(&document, "hud-difficulty", state.difficulty().as_str());
            set_text(&document, "hud-streak", &state.streak.to_string());
            set_text(
                &document,
                "hud-lives",
                &state.lives.map(|l| l.to_string()).unwrap_or_else(|| "∞".to_string()),
            );
            set_text(&document, "hud-best", &format_ms(state.best_time_ms));
            let last = self
                .session
                .round
                .as_ref()
                .and_then(|r| r.result)
                .and_then(|r| r.reaction_ms());
            set_text(&document, "hud-reaction", &format_ms(last));
            set_text(&document, "feedback", self.session.feedback().unwrap_or(""));

            let status = match self.session.phase {
                GamePhase::Idle if state.first_time => "Click to start the tutorial game",
                GamePhase::Idle if state.too_early => "Too early! Click to try again",
                GamePhase::Idle => "Click to start",
                GamePhase::GhostReplay => "Watch your ghost...",
                GamePhase::AwaitingTarget => "Wait for the target...",
                GamePhase::TargetShown => "Click!",
                GamePhase::Resolved => "",
                GamePhase::GameOver => "Game over - click to play again",
            };
            set_text(&document, "status", status);

            if let Some(el) = element(&document, "target") {
                match self.session.round.as_ref() {
                    Some(round) if self.session.phase == GamePhase::TargetShown => {
                        let style = el.style();
                        let size = format!("{}px", round.target.size);
                        let _ = style.set_property("left", &format!("{}%", round.target.position.x));
                        let _ = style.set_property("top", &format!("{}%", round.target.position.y));
                        let _ = style.set_property("width", &size);
                        let _ = style.set_property("height", &size);
                        let _ = el.class_list().remove_1("hidden");
                    }
                    _ => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }

            if let Some(el) = element(&document, "ghost") {
                match self.session.records.ghost {
                    Some(ghost) if self.session.phase == GamePhase::GhostReplay => {
                        el.set_text_content(Some(&format!("{}ms", ghost.time_ms)));
                        let _ = el.class_list().remove_1("hidden");
                    }
                    _ => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn format_ms(ms: Option<u32>) -> String {
        ms.map(|ms| format!("{}ms", ms)).unwrap_or_else(|| "-".to_string())
    }

    fn now_ms() -> u64 {
        js_sys::Date::now() as u64
    }

    /// `?variant=arcade` picks the variant, Zone otherwise
    fn variant_from_query() -> Variant {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.strip_prefix("variant="))
            .find_map(Variant::from_str)
            .unwrap_or_default()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Reaction Zone starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let variant = variant_from_query();
        let seed = now_ms();
        let game = Rc::new(RefCell::new(Game::new(variant, seed)));
        set_text(&document, "variant-name", variant.as_str());

        let area = document
            .get_element_by_id("game-area")
            .ok_or("no #game-area element")?;

        setup_input_handlers(&area, game.clone())?;
        setup_page_hide(game.clone())?;
        request_animation_frame(game);

        log::info!("Reaction Zone running ({})", variant.as_str());
        Ok(())
    }

    fn setup_input_handlers(area: &web_sys::Element, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Mouse down on the game area
        {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = area_clone.get_bounding_client_rect();
                let click = Click {
                    pos: Vec2::new(
                        event.client_x() as f32 - rect.left() as f32,
                        event.client_y() as f32 - rect.top() as f32,
                    ),
                    area: Vec2::new(rect.width() as f32, rect.height() as f32),
                };
                game.borrow_mut().handle_click(now_ms(), click);
            });
            area.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard shortcuts
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => g.input.start = true,
                    "r" | "R" => g.input.reset = true,
                    "t" | "T" => g.input.advance_tutorial = true,
                    "Escape" => g.input.skip_tutorial = true,
                    "i" | "I" => {
                        g.autoplay = !g.autoplay;
                        log::info!("Autoplay: {}", g.autoplay);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Drop the pending timer when the page goes away
    fn setup_page_hide(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            game.borrow_mut().session.cancel_pending(now_ms());
            log::info!("Page hidden, pending timer cancelled");
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update(now_ms());
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Rounds the native demo plays before stopping a run that never ends
#[cfg(not(target_arch = "wasm32"))]
const DEMO_ROUNDS: u32 = 30;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use reaction_zone::{Tuning, Variant};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // reaction-zone [variant] [seed] [tuning.json]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let variant = match args.first() {
        Some(name) => Variant::from_str(name).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using Zone", name);
            Variant::Zone
        }),
        None => Variant::default(),
    };
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.get(2) {
        Some(path) => load_tuning(path).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    log::info!("Reaction Zone (native) starting...");
    run_demo(variant, &tuning, seed);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<reaction_zone::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(reaction_zone::Tuning::from_json(&json)?)
}

/// Let the autopilot play one run, one simulated frame at a time
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(variant: reaction_zone::Variant, tuning: &reaction_zone::Tuning, seed: u64) {
    use reaction_zone::consts::FRAME_MS;
    use reaction_zone::sim::{GamePhase, Session, TickInput, tick};

    let mut session = Session::new(variant, tuning.rules(variant).clone(), seed);
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    let mut now = 0;
    while session.phase != GamePhase::GameOver && session.rounds_started() <= DEMO_ROUNDS {
        tick(&mut session, &input, now);
        for event in session.drain_events() {
            log_event(&event);
        }
        now += FRAME_MS;
    }
    if session.phase != GamePhase::GameOver {
        session.reset(now);
    }

    let best = session
        .state
        .best_time_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "-".to_string());
    println!("\n{} demo (seed {})", variant.as_str(), seed);
    println!("  rounds played: {}", session.rounds_started());
    println!("  best time:     {}", best);
    println!("  best streak:   {}", session.state.best_streak);
    for (rank, entry) in session.records.entries.iter().enumerate() {
        println!(
            "  #{} {} points, level {} ({:.1}s)",
            rank + 1,
            entry.score,
            entry.level,
            entry.timestamp_ms as f64 / 1000.0
        );
    }
}
