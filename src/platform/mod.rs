//! Browser platform layer
//!
//! Everything a mounted game holds on the page is owned by a guard:
//! - `ListenerGuard` removes its event listener on drop
//! - `FrameLoop` cancels the pending animation frame on drop
//! - `MountedGame` owns both, so unmounting is just dropping it

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, PointerEvent};

use crate::catalog::GameId;
use crate::consts::FRAME_MS;
use crate::input::{Actions, InputEvent};
use crate::persistence::LocalStore;
use crate::renderer::CanvasSurface;
use crate::runtime::GameRuntime;
use crate::settings::Settings;

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// An event listener that lives as long as this value
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    pub fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` loop, rescheduled after every frame until dropped
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let window = window()?;
        let handle = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let next_handle = handle.clone();
        let loop_window = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            on_frame(time);
            if let Some(cb) = next.borrow().as_ref() {
                next_handle.set(loop_window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            handle.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }
        Ok(Self { handle, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

/// Map a client-space pointer position to surface pixels
fn surface_point(canvas: &HtmlCanvasElement, surface: Vec2, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        ((client_x - rect.left()) / rect.width()) as f32 * surface.x,
        ((client_y - rect.top()) / rect.height()) as f32 * surface.y,
    )
}

/// Hold listeners for every `[data-action]` button on the page
fn attach_action_buttons(
    runtime: &Rc<RefCell<GameRuntime>>,
    listeners: &mut Vec<ListenerGuard>,
) -> Result<(), JsValue> {
    let document = window()?.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let buttons = document.query_selector_all("[data-action]")?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.get(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let name = button.get_attribute("data-action").unwrap_or_default();
        let Some(action) = Actions::from_button(&name) else {
            log::warn!("Unknown control button action: {:?}", name);
            continue;
        };
        for (event, down) in [
            ("pointerdown", true),
            ("pointerup", false),
            ("pointercancel", false),
            ("pointerleave", false),
        ] {
            let runtime = runtime.clone();
            listeners.push(ListenerGuard::attach(&button, event, move |event: Event| {
                // No focus or text selection on long press
                event.prevent_default();
                let input = if down { InputEvent::ActionDown(action) } else { InputEvent::ActionUp(action) };
                runtime.borrow_mut().handle_input(&input);
            })?);
        }
    }
    Ok(())
}

/// One game mounted on a canvas, with its listeners and frame loop
pub struct MountedGame {
    runtime: Rc<RefCell<GameRuntime>>,
    surface: Rc<RefCell<CanvasSurface>>,
    _listeners: Vec<ListenerGuard>,
    _frame: FrameLoop,
}

impl MountedGame {
    /// Mount `id` on `canvas`. `on_frame` runs after each frame's update and
    /// render (HUD refresh).
    pub fn mount<H>(
        canvas: &HtmlCanvasElement,
        id: GameId,
        settings: &Settings,
        mut on_frame: H,
    ) -> Result<Self, JsValue>
    where
        H: FnMut(&GameRuntime) + 'static,
    {
        let mut store = LocalStore::open();
        let seed = js_sys::Date::now() as u64;
        let runtime = Rc::new(RefCell::new(GameRuntime::load(id, seed, &store)));

        let (w, h) = id.surface_size();
        let size = Vec2::new(w as f32, h as f32);
        let surface = Rc::new(RefCell::new(CanvasSurface::attach(canvas, size, settings.glow_effects)?));

        let window: EventTarget = window()?.into();
        let mut listeners = Vec::new();

        for (event, down) in [("keydown", true), ("keyup", false)] {
            let runtime = runtime.clone();
            listeners.push(ListenerGuard::attach(&window, event, move |event: Event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let code = key.code();
                if Actions::from_key(&code).is_none() {
                    return;
                }
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                let input = if down { InputEvent::KeyDown(code) } else { InputEvent::KeyUp(code) };
                runtime.borrow_mut().handle_input(&input);
            })?);
        }

        let pointer_events: [(&'static str, fn(Vec2) -> InputEvent); 5] = [
            ("pointerdown", InputEvent::PointerDown),
            ("pointermove", InputEvent::PointerMove),
            ("pointerup", InputEvent::PointerUp),
            ("pointercancel", InputEvent::PointerUp),
            ("pointerleave", InputEvent::PointerUp),
        ];
        for (event, to_input) in pointer_events {
            let runtime = runtime.clone();
            let target = canvas.clone();
            listeners.push(ListenerGuard::attach(canvas, event, move |event: Event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let point = surface_point(&target, size, pointer.client_x() as f64, pointer.client_y() as f64);
                runtime.borrow_mut().handle_input(&to_input(point));
            })?);
        }

        attach_action_buttons(&runtime, &mut listeners)?;

        let frame_runtime = runtime.clone();
        let frame_surface = surface.clone();
        let mut last_time: Option<f64> = None;
        let frame = FrameLoop::start(move |time| {
            let dt = last_time.map_or(FRAME_MS, |t| time - t);
            last_time = Some(time);
            let mut rt = frame_runtime.borrow_mut();
            rt.update(dt, &mut store);
            rt.render(&mut *frame_surface.borrow_mut());
            on_frame(&*rt);
        })?;

        log::info!("Mounted {}", id);
        Ok(Self {
            runtime,
            surface,
            _listeners: listeners,
            _frame: frame,
        })
    }

    pub fn start(&self) {
        self.runtime.borrow_mut().start();
    }

    pub fn toggle_pause(&self) {
        self.runtime.borrow_mut().toggle_pause();
    }

    /// Switch neon glow on the live canvas; the next frame repaints
    pub fn set_glow(&self, enabled: bool) {
        self.surface.borrow_mut().set_glow_enabled(enabled);
        self.runtime.borrow_mut().mark_dirty();
    }
}

impl Drop for MountedGame {
    fn drop(&mut self) {
        log::info!("Unmounted {}", self.runtime.borrow().id());
    }
}
