// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for lazysrc.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebLoader`]: a [`LazyLoader`] bound to the page's DOM
//! - [`WebHost`]: the [`Host`] implementation on `web_sys::Element`
//! - [`WebObserver`]: the shared `IntersectionObserver`
//! - [`options_from_js`]: options parsing from a JS object
//! - [`LazyImages`]: the `#[wasm_bindgen]` API for JS callers
//! - [`ConsoleSink`]: trace output to the browser console
//!
//! Without `IntersectionObserver` (or without a window) the loader runs in
//! immediate mode and activates every wrapper as it is added.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables trace events in
//!   `lazysrc_core`, so [`ConsoleSink`] receives them.

#![no_std]

extern crate alloc;

mod bindings;
mod console;
mod host;
mod loader;
mod observer;
mod options;

pub use bindings::LazyImages;
pub use console::ConsoleSink;
pub use host::WebHost;
pub use lazysrc_core::{Host, LazyLoader, LoaderOptions};
pub use loader::WebLoader;
pub use observer::WebObserver;
pub use options::options_from_js;
