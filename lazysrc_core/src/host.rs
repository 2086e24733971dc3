// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for document integrations.
//!
//! Lazysrc splits environment-specific work into *host* implementations. The
//! [`LazyLoader`](crate::loader::LazyLoader) decides *when* a wrapper loads
//! and *what* each deferred source becomes; the host performs the reads and
//! writes on its element tree. Each host provides:
//!
//! - **Capability detection** — [`Host::create_observer`] returns `None` when
//!   the environment cannot observe visibility. The loader then runs in
//!   immediate mode for its whole lifetime.
//!
//! - **Connectivity** — [`Host::is_online`] is read once per visibility batch.
//!
//! - **Queries and mutation** — descendant lookup in document order, attribute
//!   access, and class markers.
//!
//! - **Completion markers** — [`Host::on_ready_once`] attaches a single-fire
//!   [`ReadyMarker`] that the host applies when the element reports the given
//!   [`ReadySignal`]. The loader never hears about completion; the marker is
//!   purely additive.
//!
//! # Crate boundaries
//!
//! `lazysrc_core` owns configuration, the loader state machine, and this
//! contract. `lazysrc_backend_web` implements it on top of `web-sys`;
//! [`headless`](crate::headless) implements it on an in-memory tree.

use alloc::string::String;
use alloc::vec::Vec;

/// Responsive-source attribute. Its presence selects the responsive branch.
pub const SRCSET: &str = "srcset";

/// Primary source attribute.
pub const SRC: &str = "src";

/// What kind of element a deferred source is, as far as completion goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A `<video>` element; completes on [`ReadySignal::CanPlayThrough`].
    Video,
    /// Anything else; completes on [`ReadySignal::Load`].
    Other,
}

impl ElementKind {
    /// Returns the completion signal for this kind of element.
    #[must_use]
    pub const fn ready_signal(self) -> ReadySignal {
        match self {
            Self::Video => ReadySignal::CanPlayThrough,
            Self::Other => ReadySignal::Load,
        }
    }
}

/// Element completion signals the loader listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadySignal {
    /// The generic `load` event.
    Load,
    /// The media `canplaythrough` event.
    CanPlayThrough,
}

impl ReadySignal {
    /// Returns the DOM event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::CanPlayThrough => "canplaythrough",
        }
    }
}

/// Class changes a host applies once an element reports completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyMarker {
    /// Class to add.
    pub add: String,
    /// Class to remove, if any.
    pub remove: Option<String>,
}

/// A single visibility-change notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection<E> {
    /// The observed wrapper.
    pub target: E,
    /// Visible fraction of the wrapper, in `[0, 1]`.
    pub ratio: f64,
}

/// Platform visibility observation.
///
/// One observer is shared by every wrapper a loader watches. Notifications
/// are delivered back to the loader by the host, through
/// [`LazyLoader::handle_intersections`](crate::loader::LazyLoader::handle_intersections).
pub trait VisibilityObserver {
    /// Element handle type.
    type Element;

    /// Starts observing `target`.
    fn observe(&mut self, target: &Self::Element);

    /// Stops observing `target`. Unknown targets are ignored.
    fn unobserve(&mut self, target: &Self::Element);

    /// Stops observing everything.
    ///
    /// Notifications queued but not yet delivered are discarded, so the
    /// observer can be dropped right after this returns.
    fn disconnect(&mut self);
}

/// An element tree the loader can query and mutate.
pub trait Host {
    /// Element handle type. Handles compare equal when they refer to the same
    /// element.
    type Element: Clone + PartialEq;

    /// Observer type produced by [`create_observer`](Self::create_observer).
    type Observer: VisibilityObserver<Element = Self::Element>;

    /// Creates the shared visibility observer, or returns `None` if the
    /// environment has no visibility observation.
    fn create_observer(&mut self, threshold: f64) -> Option<Self::Observer>;

    /// Returns `false` if the environment reports being offline.
    fn is_online(&self) -> bool;

    /// Returns the descendants of `wrapper` carrying `attribute`, in document
    /// order. The wrapper itself is not included.
    fn deferred_sources(&self, wrapper: &Self::Element, attribute: &str) -> Vec<Self::Element>;

    /// Returns how `element` signals completion.
    fn element_kind(&self, element: &Self::Element) -> ElementKind;

    /// Returns the value of `name` on `element`.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Returns `true` if `element` carries `name`.
    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Sets `name` to `value` on `element`.
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Removes `name` from `element`.
    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    /// Adds a class marker to `element`.
    fn add_class(&mut self, element: &Self::Element, class: &str);

    /// Applies `marker` to `element` the first time it reports `signal`.
    fn on_ready_once(&mut self, element: &Self::Element, signal: ReadySignal, marker: ReadyMarker);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_waits_for_play_through() {
        assert_eq!(ElementKind::Video.ready_signal(), ReadySignal::CanPlayThrough);
        assert_eq!(ElementKind::Other.ready_signal(), ReadySignal::Load);
        assert_eq!(ReadySignal::CanPlayThrough.event_name(), "canplaythrough");
        assert_eq!(ReadySignal::Load.event_name(), "load");
    }
}
