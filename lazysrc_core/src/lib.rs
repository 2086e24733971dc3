// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-driven deferred loading of media sources.
//!
//! `lazysrc_core` decides *when* an image or video should start loading and
//! *how* its real source is put in place. Markup carries the real URL in a
//! placeholder attribute (for example `data-src`); when the element's wrapper
//! approaches visibility the loader moves that value into `src` (or `srcset`)
//! and the browser's native loading takes over. It is `no_std` compatible
//! (with `alloc`) and knows nothing about any particular document
//! implementation.
//!
//! # Architecture
//!
//! ```text
//!   LoaderOptions ──► LoaderConfig::from_options() ──► LazyLoader::new(host)
//!                                                          │
//!                            Host::create_observer() ──────┤
//!                         Some ─► Mode::Observed           │
//!                         None ─► Mode::Immediate          │
//!                                                          ▼
//!   add(wrapper) / remove(wrapper) / handle_intersections(batch)
//!                                                          │
//!                                                          ▼
//!   swap: placeholder ──► srcset | src + loading marker + ReadyMarker
//! ```
//!
//! **[`config`]** — Options, defaults, validation, and [`ConfigError`](config::ConfigError).
//!
//! **[`host`]** — The [`Host`](host::Host) and
//! [`VisibilityObserver`](host::VisibilityObserver) traits that environment
//! integrations implement.
//!
//! **[`loader`]** — The [`LazyLoader`](loader::LazyLoader) state machine.
//!
//! **[`headless`]** — An in-memory [`Host`](host::Host) for non-browser use
//! and tests.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! loader instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod headless;
pub mod host;
pub mod loader;
pub mod trace;

pub use config::{ConfigError, LoaderConfig, LoaderOptions, LoadingClassPolicy};
pub use host::{Host, Intersection, VisibilityObserver};
pub use loader::{LazyLoader, Mode};
