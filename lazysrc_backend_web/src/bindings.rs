// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JS-facing API.
//!
//! ```js
//! const lazy = new LazyImages({ sourceAttribute: "data-src", threshold: 0.5 });
//! document.querySelectorAll(".lazy").forEach((el) => lazy.add(el));
//! ```

use alloc::boxed::Box;

use wasm_bindgen::{JsError, JsValue};
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Element;

use lazysrc_core::trace::ModeKind;

use crate::console::ConsoleSink;
use crate::loader::WebLoader;
use crate::options::options_from_js;

/// Lazy image/video activation for JS callers.
///
/// Construction throws an `Error` if the options are not an object or lack a
/// string `sourceAttribute`.
#[wasm_bindgen]
#[derive(Debug)]
pub struct LazyImages {
    loader: WebLoader,
}

#[wasm_bindgen]
impl LazyImages {
    /// Creates a loader from a JS options object.
    ///
    /// # Errors
    ///
    /// Throws if `options` are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> Result<Self, JsError> {
        let loader = WebLoader::new(options_from_js(options)?)?;
        Ok(Self { loader })
    }

    /// Replaces the configuration and observer.
    ///
    /// # Errors
    ///
    /// Throws if `options` are invalid; the loader keeps its old state.
    pub fn reinit(&self, options: &JsValue) -> Result<(), JsError> {
        self.loader.reinit(options_from_js(options)?)?;
        Ok(())
    }

    /// Registers a wrapper element.
    pub fn add(&self, wrapper: &Element) {
        self.loader.add(wrapper);
    }

    /// Stops watching a wrapper element.
    pub fn remove(&self, wrapper: &Element) {
        self.loader.remove(wrapper);
    }

    /// `true` if the browser supports visibility observation.
    #[wasm_bindgen(getter)]
    pub fn observed(&self) -> bool {
        self.loader.mode() == ModeKind::Observed
    }

    /// Number of wrappers still waiting to become visible.
    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> usize {
        self.loader.watched_len()
    }

    /// Sends trace events to the browser console.
    #[wasm_bindgen(js_name = traceToConsole)]
    pub fn trace_to_console(&self) {
        self.loader.set_trace_sink(Box::new(ConsoleSink::default()));
    }
}
