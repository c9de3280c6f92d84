/*!
 * Concurrent line translation.
 *
 * This module turns input lines into CSV rows. It is split into several
 * submodules:
 *
 * - `core`: per-line `TranslationService` and its request/result types
 * - `control`: pause/resume/cancel state shared with the dispatch loop
 * - `dispatcher`: bounded-concurrency fan-out of lines to workers
 * - `sink`: single-consumer CSV writer fed by the workers
 */

// Re-export main types for easier usage
pub use self::control::{RunControl, RunState};
pub use self::core::{TranslationRequest, TranslationResult, TranslationService};
pub use self::dispatcher::{DispatchSummary, Dispatcher};
pub use self::sink::{Record, ResultSink, RowSender};

// Submodules
pub mod control;
pub mod core;
pub mod dispatcher;
pub mod sink;
