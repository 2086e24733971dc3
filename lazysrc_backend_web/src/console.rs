// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use lazysrc_core::trace::{
    BatchEvent, ModeEvent, RegisterEvent, SwapEvent, TraceSink, UnregisterEvent,
};
use wasm_bindgen::JsValue;

/// A [`TraceSink`] that writes one `console.debug` line per event.
///
/// Events are only produced when the `trace` feature is enabled.
#[derive(Clone, Debug)]
pub struct ConsoleSink {
    prefix: String,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new("[lazysrc]")
    }
}

impl ConsoleSink {
    /// Creates a sink that starts every line with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn log(&self, line: &str) {
        web_sys::console::debug_1(&JsValue::from_str(&format!("{} {line}", self.prefix)));
    }
}

impl TraceSink for ConsoleSink {
    fn on_mode(&mut self, e: &ModeEvent) {
        self.log(&format!("mode={:?} threshold={}", e.mode, e.threshold));
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        self.log(&format!("add outcome={:?} watched={}", e.outcome, e.watched));
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.log(&format!(
            "remove was_watched={} watched={}",
            e.was_watched, e.watched
        ));
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        if e.online {
            self.log(&format!("batch entries={} loaded={}", e.entries, e.loaded));
        } else {
            self.log(&format!("batch entries={} skipped: offline", e.entries));
        }
    }

    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        self.log(&format!(
            "swap branch={:?} kind={:?} value={}",
            e.branch, e.kind, e.value
        ));
    }
}
