/*!
 * # paratrans - line-aligned bulk translation
 *
 * A Rust library for translating text files line by line through a web
 * translation endpoint, with concurrent requests and ordered output.
 *
 * ## Features
 *
 * - Bounded-concurrency dispatch with pause, resume and cancel
 * - Endpoint client with rate-limit retries and optional request signing
 * - Optional alternates, per-sentence retranslation and vocabulary columns
 * - Deterministic post-processing: CSV, line-aligned text and gettext catalog
 * - BCP-47 style language tag validation backed by ISO 639 codes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `translation`: Line translation:
 *   - `translation::core`: Per-line translation service
 *   - `translation::control`: Pause/resume/cancel state
 *   - `translation::dispatcher`: Concurrent dispatch of lines
 *   - `translation::sink`: Single-writer intermediate CSV
 * - `post_processor`: Normalize, sort, extract and catalog stages
 * - `providers`: Translation endpoint integration:
 *   - `providers::google`: Endpoint client
 *   - `providers::decoder`: Response decoding
 *   - `providers::token`: Request-signing token cipher
 *   - `providers::http`, `providers::mock`: Transports
 * - `text_segmenter`: Word and sentence splitting
 * - `file_utils`: File system operations and artifact naming
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Test names follow test_subject_withCondition_shouldOutcome
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod post_processor;
pub mod providers;
pub mod text_segmenter;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport};
pub use errors::{AppError, PipelineError, ProviderError, TranslationError};
pub use file_utils::ArtifactPaths;
pub use post_processor::PostProcessor;
pub use providers::google::{GoogleTranslate, TranslateParams};
pub use translation::{DispatchSummary, Dispatcher, RunControl, RunState, ResultSink, TranslationService};
