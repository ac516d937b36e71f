//! Neon Arcade entry point
//!
//! On the web: wires the portal page to mounted games. Natively: a headless
//! run of every game against an in-memory store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_portal {
    use std::cell::RefCell;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Event, HtmlCanvasElement};

    use neon_arcade::highscores;
    use neon_arcade::persistence::LocalStore;
    use neon_arcade::platform::{ListenerGuard, MountedGame};
    use neon_arcade::sim::GamePhase;
    use neon_arcade::{GameId, GameRuntime, Language, Settings};

    thread_local! {
        /// Preferences, loaded once and edited from the settings panel
        static SETTINGS: RefCell<Settings> = RefCell::new(Settings::default());
        /// The game currently on screen
        static ACTIVE: RefCell<Option<MountedGame>> = const { RefCell::new(None) };
        /// Page-lifetime listeners
        static PORTAL: RefCell<Vec<ListenerGuard>> = const { RefCell::new(Vec::new()) };
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if hidden {
                el.class_list().add_1("hidden")
            } else {
                el.class_list().remove_1("hidden")
            };
        }
    }

    /// Refresh the per-game best scores shown on the catalog cards
    fn refresh_catalog(document: &Document) {
        let store = LocalStore::open();
        for (id, best) in highscores::load_all(&store) {
            set_text(document, &format!("[data-best=\"{}\"]", id), &best.to_string());
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(runtime: &GameRuntime) {
        let Some(document) = document() else {
            return;
        };
        let score = runtime.score();
        set_text(&document, "#hud-score .hud-value", &score.current().to_string());
        set_text(&document, "#hud-best .hud-value", &score.best().to_string());

        let phase = runtime.phase();
        set_hidden(&document, "start-overlay", phase != GamePhase::Start);
        set_hidden(&document, "game-over", phase != GamePhase::GameOver);
        set_hidden(&document, "pause-badge", !runtime.is_paused());
        if phase == GamePhase::GameOver {
            set_text(&document, "#final-score", &score.current().to_string());
        }
    }

    /// Reflect the settings on the page: `lang`/`dir` and toggle states
    fn apply_settings(document: &Document, settings: &Settings) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("lang", settings.language.code());
            let _ = root.set_attribute("dir", settings.language.text_direction());
        }
        for (selector, on) in [("[data-sound]", settings.sound_on), ("[data-glow]", settings.glow_effects)] {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                let _ = el.set_attribute("aria-pressed", if on { "true" } else { "false" });
            }
        }
        set_text(document, "#language-label", settings.language.label());
    }

    /// Edit, persist and re-apply the settings
    fn edit_settings<F>(document: &Document, edit: F)
    where
        F: FnOnce(&mut Settings),
    {
        let settings = SETTINGS.with(|cell| {
            let mut settings = cell.borrow_mut();
            edit(&mut settings);
            settings.clone()
        });
        let mut store = LocalStore::open();
        if let Err(e) = settings.save(&mut store) {
            log::warn!("Could not save settings: {}", e);
        }
        apply_settings(document, &settings);
        ACTIVE.with(|active| {
            if let Some(game) = active.borrow().as_ref() {
                game.set_glow(settings.glow_effects);
            }
        });
    }

    fn mount(document: &Document, id: GameId) {
        let settings = SETTINGS.with(|cell| cell.borrow().clone());
        unmount(document);

        let Some(canvas) = document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game-canvas on the page");
            return;
        };

        set_text(document, "#game-title", id.title());
        match MountedGame::mount(&canvas, id, &settings, update_hud) {
            Ok(game) => {
                set_hidden(document, "catalog", true);
                set_hidden(document, "game-view", false);
                ACTIVE.with(|active| *active.borrow_mut() = Some(game));
            }
            Err(e) => log::error!("Failed to mount {}: {:?}", id, e),
        }
    }

    fn unmount(document: &Document) {
        let previous = ACTIVE.with(|active| active.borrow_mut().take());
        if previous.is_some() {
            drop(previous);
            set_hidden(document, "game-view", true);
            set_hidden(document, "catalog", false);
            refresh_catalog(document);
        }
    }

    /// Delegated click handling for catalog cards, game controls and settings
    fn on_click(event: Event) {
        let Some(document) = document() else {
            return;
        };
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        if let Some(card) = target.closest("[data-game]").ok().flatten() {
            let raw = card.get_attribute("data-game").unwrap_or_default();
            match GameId::from_str(&raw) {
                Some(id) => mount(&document, id),
                None => log::warn!("Unknown game id: {:?}", raw),
            }
        } else if target.closest("#back-btn").ok().flatten().is_some() {
            unmount(&document);
        } else if target.closest("#start-btn, #restart-btn").ok().flatten().is_some() {
            ACTIVE.with(|active| {
                if let Some(game) = active.borrow().as_ref() {
                    game.start();
                }
            });
        } else if target.closest("#pause-btn").ok().flatten().is_some() {
            ACTIVE.with(|active| {
                if let Some(game) = active.borrow().as_ref() {
                    game.toggle_pause();
                }
            });
        } else if let Some(option) = target.closest("[data-lang]").ok().flatten() {
            let raw = option.get_attribute("data-lang").unwrap_or_default();
            match Language::from_code(&raw) {
                Some(language) => edit_settings(&document, |s| {
                    if s.set_language(language) {
                        log::info!("Language: {}", language.label());
                    }
                }),
                None => log::warn!("Unknown language code: {:?}", raw),
            }
        } else if target.closest("[data-sound]").ok().flatten().is_some() {
            edit_settings(&document, |s| {
                s.toggle_sound();
            });
        } else if target.closest("[data-glow]").ok().flatten().is_some() {
            edit_settings(&document, |s| {
                s.toggle_glow();
            });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Neon Arcade starting...");

        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let store = LocalStore::open();
        let settings = Settings::load(&store);
        apply_settings(&document, &settings);
        SETTINGS.with(|cell| *cell.borrow_mut() = settings);
        refresh_catalog(&document);

        let listener = ListenerGuard::attach(&document, "click", on_click)?;
        PORTAL.with(|portal| portal.borrow_mut().push(listener));

        log::info!("Neon Arcade ready: {} games", GameId::ALL.len());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_portal::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable portal");

    demo::run_all();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless play
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use neon_arcade::consts::FRAME_MS;
    use neon_arcade::input::{Actions, InputEvent};
    use neon_arcade::persistence::MemoryStore;
    use neon_arcade::renderer::CommandBuffer;
    use neon_arcade::sim::GamePhase;
    use neon_arcade::sim::memory::card_rect;
    use neon_arcade::{GameId, GameRuntime, Settings, highscores};

    /// One minute of frames
    const MAX_FRAMES: u32 = 60 * 60;

    /// Release then press, so held keys register again
    fn tap(code: &str) -> Vec<InputEvent> {
        vec![InputEvent::KeyUp(code.to_string()), InputEvent::KeyDown(code.to_string())]
    }

    /// On-screen button tap
    fn button(action: Actions) -> Vec<InputEvent> {
        vec![InputEvent::ActionUp(action), InputEvent::ActionDown(action)]
    }

    /// Scripted input for frame `n`
    fn script(id: GameId, n: u32) -> Vec<InputEvent> {
        match id {
            GameId::Snake => match n % 120 {
                0 => tap("ArrowLeft"),
                30 => button(Actions::DOWN),
                60 => tap("ArrowRight"),
                90 => button(Actions::UP),
                _ => Vec::new(),
            },
            GameId::Runner if n % 45 == 0 => tap("Space"),
            // Keyboard for the first sweeps, then a held touch dragged side to side
            GameId::Shooter if n < 160 => {
                let code = if (n / 40) % 2 == 0 { "ArrowLeft" } else { "ArrowRight" };
                let release = if code == "ArrowLeft" { "ArrowRight" } else { "ArrowLeft" };
                vec![InputEvent::KeyUp(release.to_string()), InputEvent::KeyDown(code.to_string())]
            }
            GameId::Shooter if n == 160 => vec![
                InputEvent::KeyUp("ArrowRight".to_string()),
                InputEvent::PointerDown(Vec2::new(200.0, 380.0)),
            ],
            GameId::Shooter if n % 40 == 0 => {
                let x = if (n / 40) % 2 == 0 { 40.0 } else { 360.0 };
                vec![InputEvent::PointerMove(Vec2::new(x, 380.0))]
            }
            GameId::Memory if n % 60 == 0 => {
                let (min, side) = card_rect((n / 60) as usize % 16);
                vec![InputEvent::PointerDown(min + side / 2.0)]
            }
            GameId::Reflex if n % 20 == 0 => vec![InputEvent::PointerDown(Vec2::splat(200.0))],
            _ => Vec::new(),
        }
    }

    fn play(id: GameId, seed: u64, store: &mut MemoryStore, glow: bool) {
        let (w, h) = id.surface_size();
        let mut surface = CommandBuffer::new(w as f32, h as f32).with_glow(glow);
        let mut runtime = GameRuntime::load(id, seed, store);
        runtime.start();

        let mut frames = 0;
        let mut redraws = 0;
        while frames < MAX_FRAMES && runtime.phase() == GamePhase::Playing {
            for event in script(id, frames) {
                runtime.handle_input(&event);
            }
            runtime.update(FRAME_MS, store);
            surface.reset();
            if runtime.render(&mut surface) {
                redraws += 1;
            }
            frames += 1;
        }

        log::info!(
            "{:<14} {:?} after {} frames ({} redraws, {} shapes last frame): score {} best {}",
            id.title(),
            runtime.phase(),
            frames,
            redraws,
            surface.fill_count(),
            runtime.score().current(),
            runtime.score().best(),
        );
    }

    pub fn run_all() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        if !settings.toggle_glow() {
            log::info!("Glow off for the headless run");
        }
        if let Err(e) = settings.save(&mut store) {
            log::warn!("Could not save settings: {}", e);
        }
        log::info!("Language: {} ({})", settings.language.label(), settings.language.text_direction());

        for (seed, id) in GameId::ALL.into_iter().enumerate() {
            log::info!("{} [{}]: {}", id.title(), id.category(), id.description());
            play(id, seed as u64, &mut store, settings.glow_effects);
        }

        for (id, best) in highscores::load_all(&store) {
            log::info!("Stored best for {}: {}", id, best);
        }
    }
}
