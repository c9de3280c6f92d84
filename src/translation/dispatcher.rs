/*!
 * Bounded-concurrency dispatch of input lines.
 *
 * The dispatch loop walks the input, skips blank lines, and spawns one worker
 * per remaining line into a `JoinSet`. A semaphore permit is taken before each
 * spawn, so at most `concurrency` lines are in flight and the loop itself is
 * what waits when none is free. Before every line, and again once a permit is
 * held, the loop consults the `RunControl`: paused waits, cancelled stops
 * dispatching. Workers that were
 * already spawned always finish and their rows always reach the sink.
 */

use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::errors::TranslationError;

use super::control::{RunControl, RunState};
use super::core::TranslationService;
use super::sink::ResultSink;

/// Outcome of one dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Input lines consumed, blank ones included
    pub total_lines: usize,
    /// Lines sent to a worker
    pub dispatched: usize,
    /// Blank lines skipped without a request
    pub skipped_blank: usize,
    /// Dispatched lines written untranslated
    pub failed: usize,
    /// Whether the run stopped on cancellation
    pub cancelled: bool,
}

/// Worker result: whether the primary translation failed
type WorkerOutcome = Result<bool, TranslationError>;

/// Fans lines out to translation workers
#[derive(Debug, Clone)]
pub struct Dispatcher {
    service: TranslationService,
    concurrency: usize,
}

impl Dispatcher {
    /// Create a dispatcher allowing `concurrency` lines in flight
    pub fn new(service: TranslationService, concurrency: usize) -> Self {
        Self {
            service,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum lines in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate `(line_number, text)` pairs into `sink`
    ///
    /// `progress` is called with the number of lines finished so far (skipped
    /// blank lines count as finished).
    pub async fn dispatch<I, F>(
        &self,
        lines: I,
        control: &RunControl,
        sink: &ResultSink,
        progress: F,
    ) -> Result<DispatchSummary, TranslationError>
    where
        I: IntoIterator<Item = (u64, String)>,
        F: Fn(usize) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let progress = Arc::new(progress);
        let finished = Arc::new(AtomicUsize::new(0));
        let mut workers: JoinSet<WorkerOutcome> = JoinSet::new();

        let mut summary = DispatchSummary::default();
        let mut sink_error: Option<TranslationError> = None;

        for (row_id, text) in lines {
            if halted(control).await {
                summary.cancelled = true;
                break;
            }

            while let Some(joined) = workers.try_join_next() {
                record_outcome(joined, &mut summary, &mut sink_error);
            }
            if sink_error.is_some() {
                break;
            }

            if text.trim().is_empty() {
                summary.total_lines += 1;
                summary.skipped_blank += 1;
                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                (*progress)(done);
                continue;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| TranslationError::SinkClosed(format!("dispatch semaphore closed: {}", e)))?;

            // The state may have changed while waiting for a slot
            if halted(control).await {
                drop(permit);
                summary.cancelled = true;
                break;
            }
            summary.total_lines += 1;

            let service = self.service.clone();
            let sender = sink.sender();
            let progress = progress.clone();
            let finished = finished.clone();
            let request = service.request(row_id, text);

            summary.dispatched += 1;
            workers.spawn(async move {
                let _permit = permit;
                let (result, error) = service.translate_line(&request).await;
                sender.send(result.into_record()).await?;

                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                (*progress)(done);
                Ok(error.is_some())
            });
        }

        if summary.cancelled {
            info!(
                "Dispatch cancelled after {} line(s); waiting for {} in-flight worker(s)",
                summary.total_lines,
                workers.len()
            );
        }

        while let Some(joined) = workers.join_next().await {
            record_outcome(joined, &mut summary, &mut sink_error);
        }

        if let Some(e) = sink_error {
            return Err(e);
        }

        debug!("Dispatch finished: {:?}", summary);
        Ok(summary)
    }
}

// Blocks while paused; true once cancelled
async fn halted(control: &RunControl) -> bool {
    match control.state() {
        RunState::Running => false,
        RunState::Paused => control.wait_while_paused().await == RunState::Cancelled,
        RunState::Cancelled => true,
    }
}

fn record_outcome(
    joined: Result<WorkerOutcome, tokio::task::JoinError>,
    summary: &mut DispatchSummary,
    sink_error: &mut Option<TranslationError>,
) {
    match joined {
        Ok(Ok(failed)) => {
            if failed {
                summary.failed += 1;
            }
        }
        Ok(Err(e)) => {
            error!("Worker could not deliver its row: {}", e);
            summary.failed += 1;
            sink_error.get_or_insert(e);
        }
        Err(e) => {
            error!("Worker task panicked: {}", e);
            summary.failed += 1;
        }
    }
}
