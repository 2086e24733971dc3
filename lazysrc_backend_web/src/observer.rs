// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` visibility source.
//!
//! [`WebObserver`] wraps one browser [`IntersectionObserver`][mdn] configured
//! with the loader's threshold. Its callback converts each
//! `IntersectionObserverEntry` into an [`Intersection`] and hands the batch to
//! the owning loader. The browser queues observer callbacks as tasks, so the
//! callback never runs while the loader is already borrowed.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/IntersectionObserver

use alloc::boxed::Box;
use alloc::rc::Weak;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Array;
use lazysrc_core::host::{Intersection, VisibilityObserver};
use lazysrc_core::LazyLoader;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::host::WebHost;

type ObserverClosure = Closure<dyn FnMut(Array)>;

/// A shared `IntersectionObserver` feeding one loader.
///
/// Dropping it drains pending records, disconnects the observer and
/// releases the JS callback.
pub struct WebObserver {
    observer: IntersectionObserver,
    _closure: ObserverClosure,
}

impl core::fmt::Debug for WebObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebObserver").finish_non_exhaustive()
    }
}

impl WebObserver {
    /// Creates an observer routing its batches to `route`.
    ///
    /// Returns `None` if the browser rejects the options.
    pub(crate) fn new(threshold: f64, route: Weak<RefCell<LazyLoader<WebHost>>>) -> Option<Self> {
        let closure = Closure::wrap(Box::new(move |entries: Array| {
            // The loader is gone; nothing left to activate.
            let Some(loader) = route.upgrade() else {
                return;
            };
            let batch: Vec<Intersection<Element>> = entries
                .iter()
                .map(|entry| {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    Intersection {
                        target: entry.target(),
                        ratio: entry.intersection_ratio(),
                    }
                })
                .collect();
            loader.borrow_mut().handle_intersections(&batch);
        }) as Box<dyn FnMut(Array)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init).ok()?;

        Some(Self {
            observer,
            _closure: closure,
        })
    }
}

impl VisibilityObserver for WebObserver {
    type Element = Element;

    fn observe(&mut self, target: &Element) {
        self.observer.observe(target);
    }

    fn unobserve(&mut self, target: &Element) {
        self.observer.unobserve(target);
    }

    fn disconnect(&mut self) {
        // An observer with no queued records gets no further callback.
        let _ = self.observer.take_records();
        self.observer.disconnect();
    }
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        VisibilityObserver::disconnect(self);
    }
}
