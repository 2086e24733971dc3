// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lazy loader state machine.
//!
//! A [`LazyLoader`] owns its configuration, its [`Host`], the shared
//! visibility observer (if the host has one), and the registry of watched
//! wrappers. All entry points are synchronous and expect to be called from a
//! single event loop:
//!
//! ```text
//!   add(wrapper) ──► Mode::Observed ──► observer.observe(wrapper)
//!        │                                      │
//!        │                     host delivers notifications
//!        │                                      ▼
//!        │                       handle_intersections(batch)
//!        │                                      │  online, ratio qualifies,
//!        │                                      │  wrapper still watched
//!        ▼                                      ▼
//!   Mode::Immediate ─────────────────► load wrapper: swap every
//!                                      deferred source in document order
//! ```
//!
//! Swapping is one-shot per element: the placeholder attribute is removed as
//! part of the swap, so a source is never activated twice.

use alloc::boxed::Box;
use alloc::string::ToString as _;
use alloc::vec::Vec;

use crate::config::{ConfigError, LoaderConfig, LoaderOptions, LoadingClassPolicy};
use crate::host::{Host, Intersection, ReadyMarker, SRC, SRCSET, VisibilityObserver};
use crate::trace::{
    BatchEvent, ModeEvent, ModeKind, NoopSink, RegisterEvent, RegisterOutcome, SwapBranch,
    SwapEvent, TraceSink, Tracer, UnregisterEvent,
};

/// Activation strategy, selected once when the loader is initialized.
#[derive(Debug)]
pub enum Mode<O> {
    /// The host can observe visibility; wrappers wait for a qualifying
    /// notification.
    Observed(O),
    /// The host cannot observe visibility; wrappers load when added.
    Immediate,
}

impl<O> Mode<O> {
    /// Returns the mode without its observer.
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Observed(_) => ModeKind::Observed,
            Self::Immediate => ModeKind::Immediate,
        }
    }

    /// Returns the shared observer in observed mode.
    #[must_use]
    pub const fn observer(&self) -> Option<&O> {
        match self {
            Self::Observed(observer) => Some(observer),
            Self::Immediate => None,
        }
    }
}

/// Defers media sources until their wrapper becomes visible.
///
/// Create with [`LazyLoader::new`], register wrappers with
/// [`add`](Self::add), and forward the host's visibility notifications to
/// [`handle_intersections`](Self::handle_intersections).
///
/// Adding a wrapper that is already watched is a no-op, and a wrapper loads
/// at most once per registration: it leaves the registry before its sources
/// are swapped, so repeated or late notifications for it are ignored.
pub struct LazyLoader<H: Host> {
    config: LoaderConfig,
    host: H,
    mode: Mode<H::Observer>,
    watched: Vec<H::Element>,
    sink: Box<dyn TraceSink>,
}

impl<H: Host> core::fmt::Debug for LazyLoader<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LazyLoader")
            .field("config", &self.config)
            .field("mode", &self.mode.kind())
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl<H: Host> LazyLoader<H> {
    /// Validates `options` and creates a loader on `host`.
    ///
    /// Validation happens before the host is asked for an observer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `options` do not describe a valid
    /// [`LoaderConfig`].
    pub fn new(options: LoaderOptions, host: H) -> Result<Self, ConfigError> {
        let config = LoaderConfig::from_options(options)?;
        Ok(Self::with_config(config, host))
    }

    /// Creates a loader from an already validated config.
    #[must_use]
    pub fn with_config(config: LoaderConfig, mut host: H) -> Self {
        let mode = select_mode(&mut host, &config);
        Self {
            config,
            host,
            mode,
            watched: Vec::new(),
            sink: Box::new(NoopSink),
        }
    }

    /// Replaces the configuration and the observer.
    ///
    /// On success the old observer is disconnected and every wrapper still
    /// waiting to load carries over under the new configuration: it is
    /// observed again by the new observer, or loaded right away if the host
    /// no longer offers one. On error the loader is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `options` do not describe a valid
    /// [`LoaderConfig`].
    pub fn reinit(&mut self, options: LoaderOptions) -> Result<(), ConfigError> {
        let config = LoaderConfig::from_options(options)?;
        if let Mode::Observed(ref mut observer) = self.mode {
            observer.disconnect();
        }
        self.mode = select_mode(&mut self.host, &config);
        self.config = config;
        let event = self.mode_event();
        Tracer::new(&mut *self.sink).mode(&event);

        match self.mode {
            Mode::Observed(ref mut observer) => {
                for wrapper in &self.watched {
                    observer.observe(wrapper);
                }
            }
            Mode::Immediate => {
                for wrapper in core::mem::take(&mut self.watched) {
                    self.load_wrapper(&wrapper);
                }
            }
        }
        Ok(())
    }

    /// Installs a trace sink and replays the current mode to it.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = sink;
        let event = self.mode_event();
        Tracer::new(&mut *self.sink).mode(&event);
    }

    /// Registers `wrapper`.
    ///
    /// In observed mode the wrapper is handed to the observer; nothing else
    /// happens until a qualifying notification arrives. In immediate mode
    /// every deferred source inside it is swapped before this returns.
    pub fn add(&mut self, wrapper: &H::Element) {
        let outcome = match self.mode {
            Mode::Observed(ref mut observer) => {
                if self.watched.contains(wrapper) {
                    RegisterOutcome::AlreadyWatched
                } else {
                    observer.observe(wrapper);
                    self.watched.push(wrapper.clone());
                    RegisterOutcome::Observed
                }
            }
            Mode::Immediate => {
                self.load_wrapper(wrapper);
                RegisterOutcome::Immediate
            }
        };
        Tracer::new(&mut *self.sink).register(&RegisterEvent {
            outcome,
            watched: self.watched.len(),
        });
    }

    /// Stops watching `wrapper`.
    ///
    /// Wrappers that were never added are ignored, as is every call in
    /// immediate mode.
    pub fn remove(&mut self, wrapper: &H::Element) {
        let mut was_watched = false;
        if let Mode::Observed(ref mut observer) = self.mode {
            observer.unobserve(wrapper);
            if let Some(pos) = self.watched.iter().position(|w| w == wrapper) {
                self.watched.remove(pos);
                was_watched = true;
            }
        }
        Tracer::new(&mut *self.sink).unregister(&UnregisterEvent {
            was_watched,
            watched: self.watched.len(),
        });
    }

    /// Handles a batch of visibility notifications.
    ///
    /// Nothing happens while the host is offline; the wrappers stay watched
    /// and load on a later qualifying notification. Otherwise every watched
    /// wrapper whose ratio is at least the threshold and above zero is
    /// removed and loaded, in batch order.
    pub fn handle_intersections(&mut self, batch: &[Intersection<H::Element>]) {
        if !self.host.is_online() {
            Tracer::new(&mut *self.sink).batch(&BatchEvent {
                entries: batch.len(),
                loaded: 0,
                online: false,
            });
            return;
        }

        let mut loaded = 0;
        for entry in batch {
            if !self.config.qualifies(entry.ratio) || !self.is_watching(&entry.target) {
                continue;
            }
            self.remove(&entry.target);
            self.load_wrapper(&entry.target);
            loaded += 1;
        }

        Tracer::new(&mut *self.sink).batch(&BatchEvent {
            entries: batch.len(),
            loaded,
            online: true,
        });
    }

    /// Stops all observation and forgets every watched wrapper.
    ///
    /// The mode is kept; wrappers added afterwards are observed again.
    pub fn disconnect(&mut self) {
        if let Mode::Observed(ref mut observer) = self.mode {
            observer.disconnect();
        }
        self.watched.clear();
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the activation mode.
    #[must_use]
    pub fn mode(&self) -> &Mode<H::Observer> {
        &self.mode
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns `true` if `wrapper` is waiting for a qualifying notification.
    #[must_use]
    pub fn is_watching(&self, wrapper: &H::Element) -> bool {
        self.watched.contains(wrapper)
    }

    /// Returns the number of watched wrappers.
    #[must_use]
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    fn mode_event(&self) -> ModeEvent {
        ModeEvent {
            mode: self.mode.kind(),
            threshold: self.config.threshold(),
        }
    }

    fn load_wrapper(&mut self, wrapper: &H::Element) {
        let sources = self
            .host
            .deferred_sources(wrapper, self.config.source_attribute());
        for source in &sources {
            self.swap_source(source);
        }
    }

    /// Moves the placeholder value into `srcset` or `src` and drops the
    /// placeholder.
    fn swap_source(&mut self, source: &H::Element) {
        let attribute = self.config.source_attribute();
        let Some(value) = self.host.attribute(source, attribute) else {
            return;
        };
        let kind = self.host.element_kind(source);

        let branch = if self.host.has_attribute(source, SRCSET) {
            self.host.set_attribute(source, SRCSET, &value);
            SwapBranch::Responsive
        } else {
            self.host.set_attribute(source, SRC, &value);
            self.host.add_class(source, self.config.is_loading_class());
            let marker = ReadyMarker {
                add: self.config.is_loaded_class().to_string(),
                remove: match self.config.loading_class_policy() {
                    LoadingClassPolicy::Keep => None,
                    LoadingClassPolicy::RemoveOnLoaded => {
                        Some(self.config.is_loading_class().to_string())
                    }
                },
            };
            self.host.on_ready_once(source, kind.ready_signal(), marker);
            SwapBranch::Primary
        };
        self.host.remove_attribute(source, attribute);

        Tracer::new(&mut *self.sink).swap(&SwapEvent {
            branch,
            kind,
            value: &value,
        });
    }
}

impl<H: Host> Drop for LazyLoader<H> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn select_mode<H: Host>(host: &mut H, config: &LoaderConfig) -> Mode<H::Observer> {
    match host.create_observer(config.threshold()) {
        Some(observer) => Mode::Observed(observer),
        None => Mode::Immediate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDocument, NodeId};
    use crate::host::ReadySignal;

    /// A wrapper holding one image with `data-src="x.jpg"`.
    fn gallery(doc: &mut HeadlessDocument) -> (NodeId, NodeId) {
        let wrapper = doc.element(doc.body(), "figure", &[]);
        let img = doc.element(wrapper, "img", &[("data-src", "x.jpg")]);
        (wrapper, img)
    }

    fn seen(target: NodeId, ratio: f64) -> Intersection<NodeId> {
        Intersection { target, ratio }
    }

    fn loader(options: LoaderOptions, doc: HeadlessDocument) -> LazyLoader<HeadlessDocument> {
        LazyLoader::new(options, doc).unwrap()
    }

    #[test]
    fn observed_mode_waits_for_threshold() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.5), doc);
        assert_eq!(loader.mode().kind(), ModeKind::Observed);

        loader.add(&wrapper);
        assert!(loader.mode().observer().unwrap().is_observing(wrapper));

        loader.handle_intersections(&[seen(wrapper, 0.0)]);
        assert_eq!(loader.host().attribute(&img, "data-src").as_deref(), Some("x.jpg"));
        assert_eq!(loader.host().attribute(&img, "src"), None);

        loader.handle_intersections(&[seen(wrapper, 0.6)]);
        let doc = loader.host();
        assert_eq!(doc.attribute(&img, "src").as_deref(), Some("x.jpg"));
        assert_eq!(doc.attribute(&img, "data-src"), None);
        assert!(doc.has_class(img, "is-loading"));
        assert!(!doc.has_class(img, "is-loaded"));
        assert!(!loader.is_watching(&wrapper));
        assert!(!loader.mode().observer().unwrap().is_observing(wrapper));

        assert!(loader.host_mut().dispatch(img, ReadySignal::Load));
        let doc = loader.host();
        assert!(doc.has_class(img, "is-loaded"));
        assert!(doc.has_class(img, "is-loading"));
    }

    #[test]
    fn below_threshold_keeps_watching() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.5), doc);
        loader.add(&wrapper);

        loader.handle_intersections(&[seen(wrapper, 0.3)]);
        assert!(loader.is_watching(&wrapper));
        assert!(loader.host().has_attribute(&img, "data-src"));
    }

    #[test]
    fn zero_ratio_never_loads_even_with_zero_threshold() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        loader.add(&wrapper);

        loader.handle_intersections(&[seen(wrapper, 0.0), seen(wrapper, 0.0)]);
        assert!(loader.is_watching(&wrapper));
        assert!(loader.host().has_attribute(&img, "data-src"));

        loader.handle_intersections(&[seen(wrapper, 0.001)]);
        assert!(!loader.host().has_attribute(&img, "data-src"));
    }

    #[test]
    fn immediate_mode_swaps_before_add_returns() {
        let mut doc = HeadlessDocument::without_observer();
        let wrapper = doc.element(doc.body(), "div", &[]);
        let first = doc.element(wrapper, "img", &[("data-src", "1.jpg")]);
        let nested = doc.element(wrapper, "span", &[]);
        let second = doc.element(nested, "img", &[("data-src", "2.jpg")]);
        let third = doc.element(wrapper, "img", &[("data-src", "3.jpg")]);

        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        assert_eq!(loader.mode().kind(), ModeKind::Immediate);
        assert_eq!(loader.host().observers_created(), 0);

        loader.add(&wrapper);
        let doc = loader.host();
        assert_eq!(doc.activation_order("data-src"), [first, second, third]);
        for img in [first, second, third] {
            assert!(!doc.has_attribute(&img, "data-src"));
            assert!(doc.has_class(img, "is-loading"));
        }
        assert_eq!(doc.attribute(&second, "src").as_deref(), Some("2.jpg"));
        assert_eq!(loader.watched_len(), 0);

        // Nothing to cancel.
        loader.remove(&wrapper);
        assert_eq!(loader.watched_len(), 0);
    }

    #[test]
    fn wrapper_itself_is_not_a_source() {
        let mut doc = HeadlessDocument::without_observer();
        let wrapper = doc.element(doc.body(), "img", &[("data-src", "self.jpg")]);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);

        loader.add(&wrapper);
        assert!(loader.host().has_attribute(&wrapper, "data-src"));
        assert!(loader.host().activation_order("data-src").is_empty());
    }

    #[test]
    fn responsive_sources_get_srcset_and_no_markers() {
        let mut doc = HeadlessDocument::without_observer();
        let picture = doc.element(doc.body(), "picture", &[]);
        let source = doc.element(
            picture,
            "source",
            &[("srcset", ""), ("data-src", "a.webp 1x, b.webp 2x")],
        );
        let img = doc.element(picture, "img", &[("data-src", "a.jpg")]);

        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        loader.add(&picture);

        let doc = loader.host();
        assert_eq!(
            doc.attribute(&source, "srcset").as_deref(),
            Some("a.webp 1x, b.webp 2x")
        );
        assert_eq!(doc.attribute(&source, "src"), None);
        assert!(!doc.has_attribute(&source, "data-src"));
        assert!(!doc.has_class(source, "is-loading"));
        assert_eq!(doc.pending_ready(source), 0);

        assert_eq!(doc.attribute(&img, "src").as_deref(), Some("a.jpg"));
        assert_eq!(doc.pending_ready(img), 1);
    }

    #[test]
    fn video_waits_for_play_through() {
        let mut doc = HeadlessDocument::without_observer();
        let wrapper = doc.element(doc.body(), "div", &[]);
        let video = doc.element(wrapper, "VIDEO", &[("data-src", "clip.mp4")]);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        loader.add(&wrapper);

        let doc = loader.host_mut();
        assert!(!doc.dispatch(video, ReadySignal::Load));
        assert!(!doc.has_class(video, "is-loaded"));
        assert!(doc.dispatch(video, ReadySignal::CanPlayThrough));
        assert!(doc.has_class(video, "is-loaded"));
        // Single fire.
        assert!(!doc.dispatch(video, ReadySignal::CanPlayThrough));
    }

    #[test]
    fn remove_on_loaded_policy_drops_loading_marker() {
        let mut doc = HeadlessDocument::without_observer();
        let (wrapper, img) = gallery(&mut doc);
        let options = LoaderOptions::new("data-src")
            .is_loading_class("busy")
            .is_loaded_class("ready")
            .loading_class_policy(LoadingClassPolicy::RemoveOnLoaded);
        let mut loader = loader(options, doc);
        loader.add(&wrapper);
        assert!(loader.host().has_class(img, "busy"));

        loader.host_mut().dispatch(img, ReadySignal::Load);
        assert!(loader.host().has_class(img, "ready"));
        assert!(!loader.host().has_class(img, "busy"));
    }

    #[test]
    fn offline_batches_are_skipped_until_online() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.5), doc);
        loader.add(&wrapper);

        loader.host_mut().set_online(false);
        loader.handle_intersections(&[seen(wrapper, 1.0)]);
        assert!(loader.is_watching(&wrapper));
        assert!(loader.host().has_attribute(&img, "data-src"));
        assert_eq!(loader.host().attribute(&img, "src"), None);

        loader.host_mut().set_online(true);
        loader.handle_intersections(&[seen(wrapper, 0.75)]);
        assert!(!loader.is_watching(&wrapper));
        assert_eq!(loader.host().attribute(&img, "src").as_deref(), Some("x.jpg"));
    }

    #[test]
    fn each_wrapper_loads_once() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);

        loader.add(&wrapper);
        loader.add(&wrapper);
        assert_eq!(loader.watched_len(), 1);
        assert_eq!(loader.mode().observer().unwrap().observe_calls(), 1);

        loader.handle_intersections(&[seen(wrapper, 0.4), seen(wrapper, 0.9)]);
        assert_eq!(loader.host().activation_order("data-src"), [img]);

        // A fresh placeholder on the same element is not picked up by a late
        // notification for a wrapper that already loaded.
        loader.host_mut().set_attribute(&img, "data-src", "y.jpg");
        loader.handle_intersections(&[seen(wrapper, 1.0)]);
        assert_eq!(loader.host().activation_order("data-src"), [img]);
        assert_eq!(loader.host().attribute(&img, "src").as_deref(), Some("x.jpg"));
    }

    #[test]
    fn removed_wrappers_ignore_notifications() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let never_added = doc.element(doc.body(), "div", &[]);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);

        loader.remove(&never_added);
        loader.add(&wrapper);
        loader.remove(&wrapper);
        assert!(!loader.mode().observer().unwrap().is_observing(wrapper));

        loader.handle_intersections(&[seen(wrapper, 1.0), seen(never_added, 1.0)]);
        assert!(loader.host().has_attribute(&img, "data-src"));

        // Re-adding after removal watches again.
        loader.add(&wrapper);
        loader.handle_intersections(&[seen(wrapper, 1.0)]);
        assert!(!loader.host().has_attribute(&img, "data-src"));
    }

    #[test]
    fn reinit_replaces_config_and_observer() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.2), doc);
        loader.add(&wrapper);
        assert_eq!(loader.host().observers_created(), 1);

        loader
            .reinit(LoaderOptions::new("data-lazy").threshold(0.9))
            .unwrap();
        assert_eq!(loader.host().observers_created(), 2);
        assert_eq!(loader.config().source_attribute(), "data-lazy");
        assert_eq!(loader.mode().observer().unwrap().threshold(), 0.9);
        assert!(loader.is_watching(&wrapper));
        assert!(loader.mode().observer().unwrap().is_observing(wrapper));

        // Re-adding a carried-over wrapper does not observe it twice.
        loader.add(&wrapper);
        assert_eq!(loader.mode().observer().unwrap().observe_calls(), 1);

        loader.handle_intersections(&[seen(wrapper, 0.5)]);
        assert!(loader.is_watching(&wrapper));

        loader.handle_intersections(&[seen(wrapper, 1.0)]);
        assert!(!loader.is_watching(&wrapper));
        // The old attribute name is no longer recognized.
        assert!(loader.host().has_attribute(&img, "data-src"));
        assert_eq!(loader.host().attribute(&img, "src"), None);
    }

    #[test]
    fn pending_wrappers_load_under_new_config() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.8), doc);
        loader.add(&wrapper);

        loader
            .reinit(LoaderOptions::new("data-src").threshold(0.1))
            .unwrap();
        assert!(loader.mode().observer().unwrap().is_observing(wrapper));

        loader.handle_intersections(&[seen(wrapper, 0.2)]);
        assert_eq!(loader.host().attribute(&img, "src").as_deref(), Some("x.jpg"));
        assert_eq!(loader.host().attribute(&img, "data-src"), None);
        assert_eq!(loader.watched_len(), 0);
    }

    #[test]
    fn failed_reinit_leaves_loader_untouched() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, _img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        loader.add(&wrapper);

        let err = loader.reinit(LoaderOptions::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingSourceAttribute);
        assert_eq!(loader.host().observers_created(), 1);
        assert!(loader.is_watching(&wrapper));
        assert_eq!(loader.config().source_attribute(), "data-src");
    }

    #[test]
    fn reinit_without_observer_falls_back_to_immediate() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);

        loader.host_mut().set_observer_supported(false);
        loader.reinit(LoaderOptions::new("data-src")).unwrap();
        assert_eq!(loader.mode().kind(), ModeKind::Immediate);

        loader.add(&wrapper);
        assert!(!loader.host().has_attribute(&img, "data-src"));
    }

    #[test]
    fn reinit_to_immediate_loads_pending_wrappers() {
        let mut doc = HeadlessDocument::new();
        let (wrapper, img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src").threshold(0.5), doc);
        loader.add(&wrapper);

        loader.host_mut().set_observer_supported(false);
        loader.reinit(LoaderOptions::new("data-src")).unwrap();
        assert_eq!(loader.watched_len(), 0);
        assert_eq!(loader.host().attribute(&img, "src").as_deref(), Some("x.jpg"));
        assert!(loader.host().has_class(img, "is-loading"));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = LazyLoader::new(LoaderOptions::new(""), HeadlessDocument::new()).unwrap_err();
        assert_eq!(err, ConfigError::EmptySourceAttribute);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_decisions() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        #[derive(Default)]
        struct Counts {
            modes: usize,
            swaps: usize,
            offline: usize,
        }
        struct CountingSink(Rc<RefCell<Counts>>);
        impl TraceSink for CountingSink {
            fn on_mode(&mut self, _: &ModeEvent) {
                self.0.borrow_mut().modes += 1;
            }
            fn on_batch(&mut self, e: &BatchEvent) {
                if !e.online {
                    self.0.borrow_mut().offline += 1;
                }
            }
            fn on_swap(&mut self, _: &SwapEvent<'_>) {
                self.0.borrow_mut().swaps += 1;
            }
        }

        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut doc = HeadlessDocument::new();
        let (wrapper, _img) = gallery(&mut doc);
        let mut loader = loader(LoaderOptions::new("data-src"), doc);
        loader.set_trace_sink(Box::new(CountingSink(Rc::clone(&counts))));

        loader.add(&wrapper);
        loader.host_mut().set_online(false);
        loader.handle_intersections(&[seen(wrapper, 1.0)]);
        loader.host_mut().set_online(true);
        loader.handle_intersections(&[seen(wrapper, 1.0)]);

        let counts = counts.borrow();
        assert_eq!(counts.modes, 1);
        assert_eq!(counts.offline, 1);
        assert_eq!(counts.swaps, 1);
    }
}
