//! Single-worker execution with an event queue.
//!
//! One compile or install operation runs at a time on a dedicated worker
//! thread so the interactive surface stays responsive. A new request while
//! one is running is rejected as a no-op. The check is advisory, not a
//! lock: check-then-start is not atomic against rapid double-invocation,
//! which the driving surface (a human issuing one command) never produces.
//!
//! Events cross to the rendering side exclusively through the returned
//! mpsc receiver - the worker owns all mutable state.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

use crate::ops::events::CompileEvent;

/// Sender half handed to worker jobs.
///
/// Send failures are deliberately ignored: a renderer that has gone away
/// must not crash the job that is mid-compile.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<CompileEvent>,
}

impl EventSink {
    /// Wrap a raw sender. Useful for drains other than [`Runner`], such
    /// as tests.
    pub fn new(tx: Sender<CompileEvent>) -> Self {
        EventSink { tx }
    }

    /// Emit an event toward the renderer.
    pub fn emit(&self, event: CompileEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs one job at a time on a dedicated worker thread.
#[derive(Debug, Default)]
pub struct Runner {
    handle: Option<JoinHandle<()>>,
}

impl Runner {
    /// Create an idle runner.
    pub fn new() -> Self {
        Runner { handle: None }
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start a job on the worker, handing it an event sink.
    ///
    /// Returns the event receiver, or `None` (no-op) if a job is already
    /// running.
    pub fn try_spawn<F>(&mut self, job: F) -> Option<Receiver<CompileEvent>>
    where
        F: FnOnce(EventSink) + Send + 'static,
    {
        if self.is_busy() {
            return None;
        }

        let (tx, rx) = channel();
        let sink = EventSink { tx };

        self.handle = Some(std::thread::spawn(move || job(sink)));
        Some(rx)
    }

    /// Wait for the current job to finish, if any.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
