// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser-bound loader handle.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use lazysrc_core::trace::{ModeKind, TraceSink};
use lazysrc_core::{ConfigError, LazyLoader, LoaderConfig, LoaderOptions};
use web_sys::Element;

use crate::host::WebHost;

/// A [`LazyLoader`] wired to the page's DOM.
///
/// The loader lives behind an `Rc<RefCell<_>>` shared with its
/// `IntersectionObserver` callback. Every method borrows it for the duration
/// of the call only.
pub struct WebLoader {
    inner: Rc<RefCell<LazyLoader<WebHost>>>,
}

impl core::fmt::Debug for WebLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_borrow() {
            Ok(loader) => f.debug_tuple("WebLoader").field(&*loader).finish(),
            Err(_) => f.debug_tuple("WebLoader").field(&"<busy>").finish(),
        }
    }
}

impl WebLoader {
    /// Validates `options` and creates a loader for the current page.
    ///
    /// Falls back to immediate mode when there is no window or the browser
    /// lacks `IntersectionObserver`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `options` are invalid. No observer is
    /// created in that case.
    pub fn new(options: LoaderOptions) -> Result<Self, ConfigError> {
        let config = LoaderConfig::from_options(options)?;
        let inner = Rc::new_cyclic(|route| {
            RefCell::new(LazyLoader::with_config(config, WebHost::new(route.clone())))
        });
        Ok(Self { inner })
    }

    /// Replaces the configuration and observer. See [`LazyLoader::reinit`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `options` are invalid; the loader is left
    /// untouched.
    pub fn reinit(&self, options: LoaderOptions) -> Result<(), ConfigError> {
        self.inner.borrow_mut().reinit(options)
    }

    /// Registers a wrapper. See [`LazyLoader::add`].
    pub fn add(&self, wrapper: &Element) {
        self.inner.borrow_mut().add(wrapper);
    }

    /// Stops watching a wrapper. See [`LazyLoader::remove`].
    pub fn remove(&self, wrapper: &Element) {
        self.inner.borrow_mut().remove(wrapper);
    }

    /// Installs a trace sink.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        self.inner.borrow_mut().set_trace_sink(sink);
    }

    /// Returns the activation mode.
    #[must_use]
    pub fn mode(&self) -> ModeKind {
        self.inner.borrow().mode().kind()
    }

    /// Returns `true` if `wrapper` is waiting to become visible.
    #[must_use]
    pub fn is_watching(&self, wrapper: &Element) -> bool {
        self.inner.borrow().is_watching(wrapper)
    }

    /// Returns the number of watched wrappers.
    #[must_use]
    pub fn watched_len(&self) -> usize {
        self.inner.borrow().watched_len()
    }
}
