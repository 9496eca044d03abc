use leptos::ev::EventDescriptor;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

use crate::domain::{chart::ResizeSubscription, logging::LogComponent};
use crate::log_warn;

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Keeps a window listener alive until [`WindowEventListenerHandle::remove`]
pub struct WindowEventListenerHandle {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl WindowEventListenerHandle {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn remove(self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

impl ResizeSubscription for WindowEventListenerHandle {
    fn unsubscribe(self) {
        self.remove();
    }
}

pub fn window_event_listener_with_options<E>(
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> WindowEventListenerHandle
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    let registered = web_sys::window().is_some_and(|window| {
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                &event_name,
                callback.as_ref().unchecked_ref(),
                &opts,
            )
            .is_ok()
    });
    if !registered {
        log_warn!(
            LogComponent::Presentation("EventUtils"),
            "⚠️ Could not listen for window '{}' events",
            event_name
        );
    }

    WindowEventListenerHandle { event_name, callback, capture: options.capture }
}

/// Passive window `resize` listener
pub fn on_window_resize(mut cb: impl FnMut() + 'static) -> WindowEventListenerHandle {
    window_event_listener_with_options(leptos::ev::resize, &EventOptions::default(), move |_| cb())
}
