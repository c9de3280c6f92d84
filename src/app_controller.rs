use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::{ArtifactPaths, FileManager};
use crate::post_processor::{PipelineOutput, PostProcessor};
use crate::providers::google::GoogleTranslate;
use crate::providers::http::HttpTransport;
use crate::providers::Transport;
use crate::text_segmenter;
use crate::translation::{DispatchSummary, Dispatcher, ResultSink, RunControl, TranslationService};

// @module: Application controller for file translation

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Every file of the run
    pub paths: ArtifactPaths,
    /// Dispatch counters
    pub summary: DispatchSummary,
    /// Rows in the intermediate CSV
    pub rows_written: usize,
    /// Post-processing results
    pub pipeline: PipelineOutput,
    /// Wall time of the whole run
    pub duration: Duration,
}

/// Main application controller for file translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Transport shared by every endpoint call
    transport: Arc<dyn Transport>,

    // @field: Use the interactive concurrency level
    interactive: bool,

    // @field: Draw a progress bar on stderr
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller talking to the real endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.endpoint.timeout()));
        Self::with_transport(config, transport)
    }

    // @method: Create a controller over a given transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            transport,
            interactive: false,
            show_progress: true,
        })
    }

    /// Switch to the interactive concurrency level
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Enable or disable the progress bar
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Maximum lines in flight for this controller
    pub fn concurrency(&self) -> usize {
        if self.interactive {
            self.config.dispatch.interactive_concurrency()
        } else {
            self.config.dispatch.concurrent_requests
        }
    }

    /// Translate `input` into `output_dir`
    pub async fn run<P1: AsRef<Path>, P2: AsRef<Path>>(&self, input: P1, output_dir: P2) -> Result<RunReport> {
        self.run_with_control(input, output_dir, RunControl::new()).await
    }

    /// Translate `input` into `output_dir`, honouring pause/resume/cancel on `control`
    pub async fn run_with_control<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input: P1,
        output_dir: P2,
        control: RunControl,
    ) -> Result<RunReport> {
        let start_time = Instant::now();
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();

        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }
        FileManager::ensure_dir(output_dir)?;

        let paths = ArtifactPaths::for_input(input, output_dir, &self.config.target_language)?;
        let lines = FileManager::read_lines(input)?;
        let total_lines = lines.len();

        info!(
            "Translating {} line(s) from {} {} -> {} with {} concurrent request(s)",
            total_lines,
            input.display(),
            self.config.source_language,
            self.config.target_language,
            self.concurrency()
        );

        let service = TranslationService::new(
            GoogleTranslate::from_config(self.transport.clone(), &self.config.endpoint),
            &self.config,
            self.stop_words()?,
        );
        let dispatcher = Dispatcher::new(service, self.concurrency());

        let sink = ResultSink::create(&paths.intermediate_csv)
            .with_context(|| format!("Failed to open {:?}", paths.intermediate_csv))?;

        let progress_bar = self.progress_bar(total_lines);
        let on_progress = {
            let progress_bar = progress_bar.clone();
            move |done: usize| progress_bar.set_position(done as u64)
        };

        let dispatched = dispatcher.dispatch(lines, &control, &sink, on_progress).await;
        progress_bar.finish_and_clear();

        // Rows already queued are written even when dispatch failed
        let rows_written = sink.finish().await.context("Failed to finish the intermediate CSV")?;
        let summary = dispatched.context("Translation dispatch failed")?;

        if summary.cancelled {
            warn!(
                "Run cancelled: {} of {} line(s) read; post-processing partial output",
                summary.total_lines, total_lines
            );
        }
        if summary.failed > 0 {
            warn!("{} line(s) could not be translated and were left empty", summary.failed);
        }

        let pipeline = PostProcessor::run(&paths, self.config.output.text_column, Some(summary.total_lines))
            .context("Post-processing failed")?;

        let duration = start_time.elapsed();
        info!(
            "Done: {} row(s), {} blank line(s) skipped, {} failed - Duration: {}",
            rows_written,
            summary.skipped_blank,
            summary.failed,
            Self::format_duration(duration)
        );
        info!("Success: {}", pipeline.aligned_text.display());

        Ok(RunReport {
            paths,
            summary,
            rows_written,
            pipeline,
            duration,
        })
    }

    fn stop_words(&self) -> Result<HashSet<String>> {
        match &self.config.output.stop_words_file {
            Some(path) => text_segmenter::load_stop_words(path),
            None => Ok(text_segmenter::default_stop_words()),
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
