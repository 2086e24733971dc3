// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM host.
//!
//! [`WebHost`] implements [`Host`] directly on `web_sys::Element` handles.
//! Attribute and class writes ignore DOM exceptions; they only fail for
//! invalid names, which the loader never produces from a valid config.

use alloc::format;
use alloc::rc::Weak;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use lazysrc_core::LazyLoader;
use lazysrc_core::host::{ElementKind, Host, ReadyMarker, ReadySignal};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Element, Window};

use crate::observer::WebObserver;

/// The DOM side of a [`WebLoader`](crate::WebLoader).
///
/// Holds a weak route back to the loader that owns it, so the
/// `IntersectionObserver` callback can deliver notifications.
pub struct WebHost {
    window: Option<Window>,
    route: Weak<RefCell<LazyLoader<Self>>>,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("window", &self.window.is_some())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    pub(crate) fn new(route: Weak<RefCell<LazyLoader<Self>>>) -> Self {
        Self {
            window: web_sys::window(),
            route,
        }
    }

    fn supports_observer(&self) -> bool {
        self.window.as_ref().is_some_and(|window| {
            js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver"))
                .unwrap_or(false)
        })
    }
}

impl Host for WebHost {
    type Element = Element;
    type Observer = WebObserver;

    fn create_observer(&mut self, threshold: f64) -> Option<WebObserver> {
        if !self.supports_observer() {
            return None;
        }
        WebObserver::new(threshold, self.route.clone())
    }

    fn is_online(&self) -> bool {
        self.window
            .as_ref()
            .is_none_or(|window| window.navigator().on_line())
    }

    fn deferred_sources(&self, wrapper: &Element, attribute: &str) -> Vec<Element> {
        let Ok(list) = wrapper.query_selector_all(&attribute_selector(attribute)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn element_kind(&self, element: &Element) -> ElementKind {
        if element.tag_name().eq_ignore_ascii_case("video") {
            ElementKind::Video
        } else {
            ElementKind::Other
        }
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_attribute(&self, element: &Element, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, element: &Element, name: &str) {
        let _ = element.remove_attribute(name);
    }

    fn add_class(&mut self, element: &Element, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn on_ready_once(&mut self, element: &Element, signal: ReadySignal, marker: ReadyMarker) {
        let target = element.clone();
        // Freed by wasm-bindgen after the first call. If the source never
        // finishes loading the closure stays alive with the element.
        let callback = Closure::once_into_js(move || {
            let classes = target.class_list();
            let _ = classes.add_1(&marker.add);
            if let Some(class) = &marker.remove {
                let _ = classes.remove_1(class);
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let _ = element.add_event_listener_with_callback_and_add_event_listener_options(
            signal.event_name(),
            callback.unchecked_ref(),
            &options,
        );
    }
}

/// Builds the `[name]` attribute-presence selector.
pub(crate) fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}
