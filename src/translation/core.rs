/*!
 * Core translation service implementation.
 *
 * This module contains the per-line `TranslationService`: it turns one
 * `TranslationRequest` into a `TranslationResult` by calling the endpoint
 * client for the primary translation and, depending on the output settings,
 * for alternates, sentence retranslations and a vocabulary breakdown.
 */

use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::app_config::{Config, OutputConfig};
use crate::errors::TranslationError;
use crate::providers::google::{GoogleTranslate, TranslateParams};
use crate::text_segmenter;

use super::sink::Record;

/// One non-blank input line waiting for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// 1-based input line number
    pub row_id: u64,
    /// Line text as read
    pub source_text: String,
    /// Source language tag
    pub from: String,
    /// Target language tag
    pub to: String,
}

impl TranslationRequest {
    /// Create a request
    pub fn new(row_id: u64, source_text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            row_id,
            source_text: source_text.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Translation of one line, ready to become a CSV record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub row_id: u64,
    pub original_text: String,
    pub primary_translation: String,
    /// Extra columns: alternates, then sentences, then vocabulary
    pub segments: Vec<String>,
}

impl TranslationResult {
    /// A row whose translation failed; keeps the row id so the line is not lost
    pub fn untranslated(request: &TranslationRequest) -> Self {
        Self {
            row_id: request.row_id,
            original_text: request.source_text.clone(),
            primary_translation: String::new(),
            segments: Vec::new(),
        }
    }

    /// `[row_id, original, primary, segments...]`
    pub fn into_record(self) -> Record {
        let mut record = Vec::with_capacity(3 + self.segments.len());
        record.push(self.row_id.to_string());
        record.push(self.original_text);
        record.push(self.primary_translation);
        record.extend(self.segments);
        record
    }
}

/// Per-line translation orchestration
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Endpoint client
    client: GoogleTranslate,
    /// Retry policy for every call
    params_template: TranslateParams,
    /// Which extra columns to produce
    output: OutputConfig,
    /// Words skipped by the vocabulary columns
    stop_words: Arc<HashSet<String>>,
}

impl TranslationService {
    /// Create a service
    pub fn new(client: GoogleTranslate, config: &Config, stop_words: HashSet<String>) -> Self {
        let params_template = TranslateParams::from_config(
            &config.source_language,
            &config.target_language,
            &config.endpoint,
        );
        Self {
            client,
            params_template,
            output: config.output.clone(),
            stop_words: Arc::new(stop_words),
        }
    }

    /// Build a request for `row_id` with the configured languages
    pub fn request(&self, row_id: u64, text: impl Into<String>) -> TranslationRequest {
        TranslationRequest::new(row_id, text, &self.params_template.from, &self.params_template.to)
    }

    fn params_for(&self, request: &TranslationRequest) -> TranslateParams {
        TranslateParams {
            from: request.from.clone(),
            to: request.to.clone(),
            ..self.params_template.clone()
        }
    }

    /// Translate one line, failing only when the primary translation fails
    pub async fn try_translate_line(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError> {
        let params = self.params_for(request);
        let text = request.source_text.as_str();

        let mut slots = self
            .client
            .translate(text, &params)
            .await
            .map_err(|e| TranslationError::for_row(request.row_id, e))?;

        let primary_translation = if slots.is_empty() { String::new() } else { slots.remove(0) };

        let mut segments = Vec::new();
        if self.output.include_alternates {
            segments.extend(slots.into_iter().filter(|alt| !alt.is_empty()));
        }

        if self.output.retranslate_sentences {
            match self.client.translate_sentences(text, &params).await {
                Ok(sentences) => segments.extend(sentences),
                Err(e) => warn!(
                    "Row {}: sentence retranslation failed: {}",
                    request.row_id,
                    TranslationError::for_row(request.row_id, e)
                ),
            }
        }

        if self.output.vocabulary {
            match self.client.vocabulary(text, &params, &self.stop_words).await {
                Ok(words) => segments.extend(words),
                Err(e) => warn!(
                    "Row {}: vocabulary lookup failed: {}",
                    request.row_id,
                    TranslationError::for_row(request.row_id, e)
                ),
            }
        }

        debug!(
            "Row {}: {} word(s), {} extra column(s)",
            request.row_id,
            text_segmenter::split_into_words(text).len(),
            segments.len()
        );

        Ok(TranslationResult {
            row_id: request.row_id,
            original_text: request.source_text.clone(),
            primary_translation,
            segments,
        })
    }

    /// Translate one line; a failed primary translation yields an untranslated row
    ///
    /// Returns the result plus the error that was absorbed, if any.
    pub async fn translate_line(&self, request: &TranslationRequest) -> (TranslationResult, Option<TranslationError>) {
        match self.try_translate_line(request).await {
            Ok(result) => (result, None),
            Err(e) => {
                warn!("Row {}: translation failed, writing it untranslated: {}", request.row_id, e);
                (TranslationResult::untranslated(request), Some(e))
            }
        }
    }
}
