//! Progress and log events emitted by a pipeline run
//!
//! The pipeline never talks to a terminal or UI itself. Whoever drives it receives
//! a stream of [`Event`]s and decides how to show them.

use std::fmt;

use tokio::sync::mpsc;

use crate::structs::Stats;

/// Pipeline states, in the order a successful run visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchRoot,
    BuildStaging,
    ResolveEach,
    Collect,
    Done,
    /// Terminal state on root failure, cancellation, or a failed playlist write
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchRoot => "fetching root document",
            Self::BuildStaging => "building staging list",
            Self::ResolveEach => "resolving staging entries",
            Self::Collect => "collecting results",
            Self::Done => "done",
            Self::Aborted => "aborted",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Stage(Stage),
    Log { level: Level, message: String },
    /// `done` staging entries out of `total` have been picked up
    Progress { done: usize, total: usize },
    Stats(Stats),
}

/// Sending half of the event channel
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<Event>,
}

impl Reporter {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: Event) {
        self.tx.send(event).ok();
    }

    pub fn stage(&self, stage: Stage) {
        self.emit(Event::Stage(stage));
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.emit(Event::Log {
            level,
            message: message.into(),
        });
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn progress(&self, done: usize, total: usize) {
        self.emit(Event::Progress { done, total });
    }

    pub fn stats(&self, stats: Stats) {
        self.emit(Event::Stats(stats));
    }
}
