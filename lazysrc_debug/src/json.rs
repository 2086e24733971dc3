// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON Lines trace output.
//!
//! [`JsonLinesSink`] writes each event as a single JSON object followed by a
//! newline. Every object carries an `"event"` key naming the event and a
//! monotonically increasing `"seq"` number.

use std::io::Write;

use serde_json::{Value, json};

use lazysrc_core::trace::{
    BatchEvent, ModeEvent, RegisterEvent, SwapEvent, TraceSink, UnregisterEvent,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    seq: u64,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, seq: 0 }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &str, mut body: Value) {
        if let Value::Object(map) = &mut body {
            map.insert("event".to_owned(), Value::from(event));
            map.insert("seq".to_owned(), Value::from(self.seq));
        }
        self.seq += 1;
        if serde_json::to_writer(&mut self.writer, &body).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_mode(&mut self, e: &ModeEvent) {
        self.emit(
            "mode",
            json!({
                "mode": format!("{:?}", e.mode),
                "threshold": e.threshold,
            }),
        );
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        self.emit(
            "add",
            json!({
                "outcome": format!("{:?}", e.outcome),
                "watched": e.watched,
            }),
        );
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.emit(
            "remove",
            json!({
                "was_watched": e.was_watched,
                "watched": e.watched,
            }),
        );
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        self.emit(
            "batch",
            json!({
                "entries": e.entries,
                "loaded": e.loaded,
                "online": e.online,
            }),
        );
    }

    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        self.emit(
            "swap",
            json!({
                "branch": format!("{:?}", e.branch),
                "kind": format!("{:?}", e.kind),
                "value": e.value,
            }),
        );
    }
}
