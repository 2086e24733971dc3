// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the loader.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`LazyLoader`](crate::loader::LazyLoader) calls at each decision point. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::host::ElementKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a loader activates wrappers, fixed when it is initialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Wrappers load when the shared observer reports them visible.
    Observed,
    /// Wrappers load synchronously when added.
    Immediate,
}

/// What [`add`](crate::loader::LazyLoader::add) did with a wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterOutcome {
    /// The wrapper is now observed.
    Observed,
    /// The wrapper was already observed; nothing changed.
    AlreadyWatched,
    /// The wrapper's sources were swapped on the spot.
    Immediate,
}

/// Which attribute a swap wrote to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapBranch {
    /// The responsive-source attribute (`srcset`). No markers are applied.
    Responsive,
    /// The primary source attribute (`src`), with loading/loaded markers.
    Primary,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a loader is initialized or re-initialized.
#[derive(Clone, Copy, Debug)]
pub struct ModeEvent {
    /// The selected mode.
    pub mode: ModeKind,
    /// The configured threshold.
    pub threshold: f64,
}

/// Emitted for every [`add`](crate::loader::LazyLoader::add).
#[derive(Clone, Copy, Debug)]
pub struct RegisterEvent {
    /// What happened.
    pub outcome: RegisterOutcome,
    /// Number of wrappers under observation afterwards.
    pub watched: usize,
}

/// Emitted for every [`remove`](crate::loader::LazyLoader::remove), including
/// the implicit one before a wrapper loads.
#[derive(Clone, Copy, Debug)]
pub struct UnregisterEvent {
    /// Whether the wrapper was under observation.
    pub was_watched: bool,
    /// Number of wrappers under observation afterwards.
    pub watched: usize,
}

/// Emitted once per visibility batch.
#[derive(Clone, Copy, Debug)]
pub struct BatchEvent {
    /// Number of notifications in the batch.
    pub entries: usize,
    /// Number of wrappers that loaded.
    pub loaded: usize,
    /// `false` if the batch was skipped because the host is offline.
    pub online: bool,
}

/// Emitted for every deferred source that is swapped.
#[derive(Clone, Copy, Debug)]
pub struct SwapEvent<'a> {
    /// The attribute written.
    pub branch: SwapBranch,
    /// The element kind, which selects the completion signal.
    pub kind: ElementKind,
    /// The value moved out of the placeholder.
    pub value: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a loader.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the loader selects its mode.
    fn on_mode(&mut self, e: &ModeEvent) {
        _ = e;
    }

    /// Called when a wrapper is added.
    fn on_register(&mut self, e: &RegisterEvent) {
        _ = e;
    }

    /// Called when a wrapper is removed.
    fn on_unregister(&mut self, e: &UnregisterEvent) {
        _ = e;
    }

    /// Called after a visibility batch is handled.
    fn on_batch(&mut self, e: &BatchEvent) {
        _ = e;
    }

    /// Called after a deferred source is swapped.
    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ModeEvent`].
    #[inline]
    pub fn mode(&mut self, e: &ModeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegisterEvent`].
    #[inline]
    pub fn register(&mut self, e: &RegisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_register(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnregisterEvent`].
    #[inline]
    pub fn unregister(&mut self, e: &UnregisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unregister(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchEvent`].
    #[inline]
    pub fn batch(&mut self, e: &BatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SwapEvent`].
    #[inline]
    pub fn swap(&mut self, e: &SwapEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_swap(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_mode(&ModeEvent {
            mode: ModeKind::Observed,
            threshold: 0.5,
        });
        sink.on_swap(&SwapEvent {
            branch: SwapBranch::Primary,
            kind: ElementKind::Other,
            value: "a.jpg",
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.batch(&BatchEvent {
            entries: 3,
            loaded: 1,
            online: true,
        });
        tracer.unregister(&UnregisterEvent {
            was_watched: false,
            watched: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::{String, ToString as _};
        use alloc::vec::Vec;

        struct RecordingSink {
            values: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_swap(&mut self, e: &SwapEvent<'_>) {
                self.values.push(e.value.to_string());
            }
        }

        let mut sink = RecordingSink { values: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.swap(&SwapEvent {
            branch: SwapBranch::Responsive,
            kind: ElementKind::Other,
            value: "a.jpg 1x, b.jpg 2x",
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.values, ["a.jpg 1x, b.jpg 2x"]);
    }
}
