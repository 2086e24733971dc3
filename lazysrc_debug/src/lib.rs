// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON Lines trace sinks for lazysrc diagnostics.
//!
//! This crate provides [`TraceSink`](lazysrc_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`] — one JSON object per event, for log pipelines.
//!
//! Depending on this crate turns on the `trace` feature of `lazysrc_core`.

pub mod json;
pub mod pretty;
