//! Browser platform glue (wasm32 only)

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::frame::FrameRequester;

/// Callback slot shared between the requester and whoever builds the closure.
/// The closure usually needs the requester's owner, so it is filled in after
/// construction.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` / `cancelAnimationFrame` requester
pub struct AnimationFrames {
    window: web_sys::Window,
    callback: FrameCallback,
}

impl AnimationFrames {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Slot to install the per-frame closure into
    pub fn callback(&self) -> FrameCallback {
        self.callback.clone()
    }
}

impl FrameRequester for AnimationFrames {
    type Handle = i32;

    fn request(&mut self) -> Option<i32> {
        let slot = self.callback.borrow();
        let closure = slot.as_ref()?;
        self.window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// A group of DOM listeners that are attached and detached together
#[derive(Default)]
pub struct EventListeners {
    entries: Vec<(web_sys::EventTarget, &'static str, Listener)>,
    attached: bool,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it is live once [`attach`](Self::attach) runs.
    /// Events that are not an `E` are ignored.
    pub fn add<E, F>(&mut self, target: &web_sys::EventTarget, event: &'static str, mut handler: F)
    where
        E: JsCast,
        F: FnMut(E) + 'static,
    {
        let closure = Listener::new(move |event: web_sys::Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        });
        self.entries.push((target.clone(), event, closure));
    }

    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        for (target, event, closure) in &self.entries {
            if let Err(e) =
                target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("Could not attach {} listener: {:?}", event, e);
            }
        }
        self.attached = true;
    }

    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for (target, event, closure) in &self.entries {
            let _ =
                target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        self.attached = false;
        log::info!("Detached {} listeners", self.entries.len());
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read a LocalStorage entry
pub fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Write a LocalStorage entry; returns false if storage is unavailable
pub fn storage_set(key: &str, value: &str) -> bool {
    local_storage()
        .map(|s| s.set_item(key, value).is_ok())
        .unwrap_or(false)
}

/// Current time in milliseconds (for scatter seeds)
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
