//! Browser shell
//!
//! Canvas-backed [`Surface`], DOM menu/HUD, input listeners, the
//! animation-frame loop and the two spawn intervals.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use super::schedule::{LoopHandles, Scheduler};
use crate::config::GameConfig;
use crate::highscores::{HighScoreStore, LocalStorageStore, MemoryStore, best_score, record_high_score};
use crate::renderer::Surface;
use crate::sim::{Direction, FrameOutcome, GameState, Rgb, Viewport, frame};

/// 2D canvas drawing surface
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the canvas to the window size
    pub fn fit_window(&self) -> Viewport {
        let (w, h) = window_size();
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        Viewport::new(w, h)
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&color.to_css(alpha));
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css(alpha));
        self.ctx.fill();
        self.ctx.close_path();
    }
}

/// `window` timer cancellation
struct WindowScheduler;

impl Scheduler for WindowScheduler {
    fn cancel_animation_frame(&mut self, id: i32) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn clear_interval(&mut self, id: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(id);
        }
    }
}

fn window_size() -> (f32, f32) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

fn set_interval(callback: &Closure<dyn FnMut()>, period_ms: f64) -> Option<i32> {
    web_sys::window()?
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms.round() as i32,
        )
        .ok()
}

/// Menu overlay and text displays
struct Hud {
    menu: Option<HtmlElement>,
    score: Option<HtmlElement>,
    best: Option<HtmlElement>,
}

impl Hud {
    fn find(document: &web_sys::Document) -> Self {
        let get = |id: &str| {
            let el = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if el.is_none() {
                log::warn!("Missing #{} element", id);
            }
            el
        };
        Self {
            menu: get("menu"),
            score: get("score"),
            best: get("high-score"),
        }
    }

    fn show_menu(&self, best: u64) {
        set_display(&self.menu, "flex");
        set_display(&self.score, "none");
        if let Some(el) = &self.best {
            el.set_text_content(Some(&format!("Best: {}", best)));
        }
    }

    fn show_game(&self) {
        set_display(&self.menu, "none");
        set_display(&self.score, "block");
        self.set_score(0);
    }

    fn set_score(&self, score: u64) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }
}

fn set_display(el: &Option<HtmlElement>, value: &str) {
    if let Some(el) = el {
        let _ = el.style().set_property("display", value);
    }
}

/// One running game with its loop handles and timer callbacks
struct Session {
    state: GameState,
    handles: LoopHandles,
    /// Kept alive until the intervals using them are cleared
    enemy_tick: Closure<dyn FnMut()>,
    fire_tick: Closure<dyn FnMut()>,
    last_score: u64,
}

/// Everything the listeners share
struct App {
    surface: CanvasSurface,
    hud: Hud,
    config: GameConfig,
    store: Box<dyn HighScoreStore>,
    session: Option<Session>,
}

type Shared = Rc<RefCell<App>>;

impl App {
    /// Stop the current session's loop and timers, then forget it
    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.handles.teardown(&mut WindowScheduler);
        }
    }

    /// Game over: stop everything, save the best score, back to the menu
    fn finish(&mut self, score: u64) {
        self.teardown();
        let best = match record_high_score(self.store.as_mut(), score) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Can't save high score: {}", e);
                best_score(self.store.as_ref()).max(score)
            }
        };
        self.hud.show_menu(best);
        log::info!("Session ended with score {} (best {})", score, best);
    }
}

/// Start a new session, replacing any running one
fn start_session(app: &Shared) {
    let mut a = app.borrow_mut();
    a.teardown();

    let viewport = a.surface.fit_window();
    a.surface.clear();
    let seed = js_sys::Date::now() as u64;
    let state = GameState::new(seed, viewport, a.config.clone());

    let enemy_tick = {
        let app = app.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.state.spawn_enemy();
            }
        })
    };
    let fire_tick = {
        let app = app.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.state.fire_shot();
            }
        })
    };

    let mut handles = LoopHandles::new();
    match set_interval(&enemy_tick, a.config.enemy_spawn_interval_ms) {
        Some(id) => handles.set_enemy_spawn(id, &mut WindowScheduler),
        None => log::error!("Couldn't start the enemy spawn timer"),
    }

    a.session = Some(Session {
        state,
        handles,
        enemy_tick,
        fire_tick,
        last_score: 0,
    });
    a.hud.show_game();
    drop(a);

    log::info!("Session started with seed {}", seed);
    request_animation_frame(app.clone());
}

fn request_animation_frame(app: Shared) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback_app = app.clone();
    let closure = Closure::once(move |time: f64| {
        game_loop(callback_app, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.handles.set_animation_frame(id);
            }
        }
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

fn game_loop(app: Shared, time: f64) {
    let outcome = {
        let mut a = app.borrow_mut();
        let a = &mut *a;
        let Some(session) = a.session.as_mut() else {
            return;
        };
        let outcome = frame(&mut session.state, time, &mut a.surface);
        if session.state.score != session.last_score {
            session.last_score = session.state.score;
            a.hud.set_score(session.state.score);
        }
        outcome
    };

    match outcome {
        FrameOutcome::Continue => request_animation_frame(app),
        FrameOutcome::GameOver { score } => app.borrow_mut().finish(score),
        FrameOutcome::Halted => {}
    }
}

fn setup_input_handlers(app: &Shared) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    // Keyboard: held directions
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(dir) = Direction::from_key(&event.key()) {
                if let Some(session) = app.borrow_mut().session.as_mut() {
                    session.state.input.press(dir);
                }
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(dir) = Direction::from_key(&event.key()) {
                if let Some(session) = app.borrow_mut().session.as_mut() {
                    session.state.input.release(dir);
                }
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer down: aim and start the fire interval
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut a = app.borrow_mut();
            let period = a.config.shot_interval_ms;
            if let Some(session) = a.session.as_mut() {
                session.state.input.pointer =
                    Vec2::new(event.client_x() as f32, event.client_y() as f32);
                session.state.input.firing = true;
                let fire_tick = &session.fire_tick;
                session.handles.start_fire(|| set_interval(fire_tick, period));
            }
        });
        window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer up: stop firing
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.state.input.firing = false;
                session.handles.stop_fire(&mut WindowScheduler);
            }
        });
        window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer move: retarget future shots
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.state.input.pointer =
                    Vec2::new(event.client_x() as f32, event.client_y() as f32);
            }
        });
        window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Window blur: keyups never arrive, so drop held keys and the fire interval
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            if let Some(session) = app.borrow_mut().session.as_mut() {
                session.state.input.clear();
                session.handles.stop_fire(&mut WindowScheduler);
                log::debug!("Input cleared (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize: canvas and simulation follow the window
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let viewport = a.surface.fit_window();
            if let Some(session) = a.session.as_mut() {
                session.state.resize(viewport.width, viewport.height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn setup_start_button(app: &Shared, document: &web_sys::Document) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id("start") else {
        log::warn!("Missing #start button; starting immediately");
        start_session(app);
        return Ok(());
    };

    let app = app.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
        start_session(&app);
    });
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Wire up the page and show the menu
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Orb Blast starting...");

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .query_selector("canvas")?
        .ok_or_else(|| JsValue::from_str("no canvas"))?
        .dyn_into()?;

    let surface = CanvasSurface::new(canvas)?;
    surface.fit_window();

    let store: Box<dyn HighScoreStore> = match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; high scores won't persist", e);
            Box::new(MemoryStore::new())
        }
    };

    let hud = Hud::find(&document);
    hud.show_menu(best_score(store.as_ref()));

    let app: Shared = Rc::new(RefCell::new(App {
        surface,
        hud,
        config: GameConfig::load(),
        store,
        session: None,
    }));

    setup_input_handlers(&app)?;
    setup_start_button(&app, &document)?;

    log::info!("Orb Blast ready");
    Ok(())
}
