//! Progress reporting while a scaffold runs
//!
//! A [`ProgressReporter`] owns a background task that emits a label once,
//! a tick at a fixed cadence, and a single terminal message when stopped.
//! Rendering goes through a [`ProgressSink`], so the same reporter drives a
//! plain dot printer, a terminal spinner, or a recording sink in tests.

use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::warn;

/// How a reporter was stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    Done,
    Failed,
}

/// Renders progress events
pub trait ProgressSink: Send + 'static {
    /// Called once, before any tick
    fn begin(&mut self, label: &str);

    /// Called at every cadence interval while running
    fn tick(&mut self);

    /// Called exactly once, after the last tick
    fn finish(&mut self, outcome: ProgressOutcome);
}

impl ProgressSink for Box<dyn ProgressSink> {
    fn begin(&mut self, label: &str) {
        (**self).begin(label);
    }

    fn tick(&mut self) {
        (**self).tick();
    }

    fn finish(&mut self, outcome: ProgressOutcome) {
        (**self).finish(outcome);
    }
}

/// Prints the label, then one dot per tick, then `Done.` or `Failed.`
pub struct DotSink<W> {
    writer: W,
}

impl<W: Write + Send + 'static> DotSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit(&mut self, text: &str) {
        // a closed stream must not take the pipeline down with it
        let _ = self.writer.write_all(text.as_bytes());
        let _ = self.writer.flush();
    }
}

impl DotSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> ProgressSink for DotSink<W> {
    fn begin(&mut self, label: &str) {
        self.emit(label);
    }

    fn tick(&mut self) {
        self.emit(".");
    }

    fn finish(&mut self, outcome: ProgressOutcome) {
        match outcome {
            ProgressOutcome::Done => self.emit("\nDone.\n"),
            ProgressOutcome::Failed => self.emit("\nFailed.\n"),
        }
    }
}

/// Swallows every event (quiet mode)
#[derive(Debug, Default)]
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn begin(&mut self, _label: &str) {}
    fn tick(&mut self) {}
    fn finish(&mut self, _outcome: ProgressOutcome) {}
}

/// Handle to a running progress task
///
/// Stop it with [`finish`](Self::finish) or [`fail`](Self::fail). Dropping
/// the handle stops the task with a failure rendering.
pub struct ProgressReporter {
    stop_tx: Option<oneshot::Sender<ProgressOutcome>>,
    task: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Spawn the reporter task. Must be called within a tokio runtime.
    pub fn start<S: ProgressSink>(sink: S, label: impl Into<String>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(run_reporter(sink, label.into(), interval, stop_rx));

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Stop ticking and render completion
    pub async fn finish(self) {
        self.stop(ProgressOutcome::Done).await;
    }

    /// Stop ticking and render failure
    pub async fn fail(self) {
        self.stop(ProgressOutcome::Failed).await;
    }

    /// Returns once the terminal message has been rendered
    async fn stop(mut self, outcome: ProgressOutcome) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(outcome);
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Progress reporter ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(ProgressOutcome::Failed);
        }
    }
}

async fn run_reporter<S: ProgressSink>(
    mut sink: S,
    label: String,
    period: Duration,
    mut stop_rx: oneshot::Receiver<ProgressOutcome>,
) {
    sink.begin(&label);

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let outcome = loop {
        tokio::select! {
            biased;
            outcome = &mut stop_rx => break outcome.unwrap_or(ProgressOutcome::Failed),
            _ = ticker.tick() => sink.tick(),
        }
    };

    sink.finish(outcome);
}
