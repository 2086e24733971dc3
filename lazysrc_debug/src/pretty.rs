// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lazysrc_core::trace::{
    BatchEvent, ModeEvent, ModeKind, RegisterEvent, RegisterOutcome, SwapBranch, SwapEvent,
    TraceSink, UnregisterEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn mode_name(mode: ModeKind) -> &'static str {
    match mode {
        ModeKind::Observed => "observed",
        ModeKind::Immediate => "immediate",
    }
}

fn outcome_name(outcome: RegisterOutcome) -> &'static str {
    match outcome {
        RegisterOutcome::Observed => "observed",
        RegisterOutcome::AlreadyWatched => "already-watched",
        RegisterOutcome::Immediate => "immediate",
    }
}

fn branch_attribute(branch: SwapBranch) -> &'static str {
    match branch {
        SwapBranch::Responsive => "srcset",
        SwapBranch::Primary => "src",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_mode(&mut self, e: &ModeEvent) {
        let _ = writeln!(
            self.writer,
            "[mode] {} threshold={}",
            mode_name(e.mode),
            e.threshold,
        );
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        let _ = writeln!(
            self.writer,
            "[add] {} watched={}",
            outcome_name(e.outcome),
            e.watched,
        );
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        let _ = writeln!(
            self.writer,
            "[remove] was_watched={} watched={}",
            e.was_watched, e.watched,
        );
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        if e.online {
            let _ = writeln!(
                self.writer,
                "[batch] entries={} loaded={}",
                e.entries, e.loaded,
            );
        } else {
            let _ = writeln!(self.writer, "[batch] entries={} OFFLINE", e.entries);
        }
    }

    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[swap] {}={} kind={:?}",
            branch_attribute(e.branch),
            e.value,
            e.kind,
        );
    }
}
