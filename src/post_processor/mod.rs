/*!
 * Post-processing of the unordered intermediate CSV.
 *
 * Workers write rows in completion order. Once every worker has joined and the
 * sink is closed, four stages turn that file into the final artifacts:
 *
 * - `normalize`: pad every row to the widest row's field count
 * - `sort`: stable numeric sort on the row id column
 * - `extract`: one text column, with blank lines restored for skipped input lines
 * - `catalog`: a gettext `.po` file keyed by zero-padded row id
 *
 * Every stage reads the previous stage's file and reports failures as a
 * `PipelineError` tagged with the stage.
 */

use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::errors::{PipelineError, Stage, StageError};
use crate::file_utils::ArtifactPaths;

pub mod catalog;
pub mod extract;
pub mod normalize;
pub mod sort;

pub use self::catalog::{csv_to_po, escape, PoEntry};
pub use self::extract::extract_column;
pub use self::normalize::normalize_columns;
pub use self::sort::numeric_sort;

/// Files produced by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub normalized_csv: PathBuf,
    pub sorted_csv: PathBuf,
    pub aligned_text: PathBuf,
    pub catalog: PathBuf,
    /// Rows in the sorted CSV
    pub rows: usize,
    /// Lines in the aligned text
    pub lines: usize,
}

/// Runs the four stages in order
#[derive(Debug, Default, Clone, Copy)]
pub struct PostProcessor;

impl PostProcessor {
    /// Turn `paths.intermediate_csv` into the sorted CSV, aligned text and catalog
    ///
    /// `column` is the 1-based CSV column extracted to the aligned text;
    /// `expected_lines` pads trailing blank input lines.
    pub fn run(paths: &ArtifactPaths, column: usize, expected_lines: Option<usize>) -> Result<PipelineOutput, PipelineError> {
        let width = normalize_columns(&paths.intermediate_csv, &paths.normalized_csv)?;
        info!("Normalized rows to {} column(s)", width);

        let rows = numeric_sort(&paths.normalized_csv, &paths.sorted_csv)?;
        info!("Sorted {} row(s)", rows);

        let lines = extract_column(&paths.sorted_csv, &paths.aligned_text, column, expected_lines)?;
        info!("Wrote {} aligned line(s) to {}", lines, paths.aligned_text.display());

        let entries = csv_to_po(&paths.sorted_csv, &paths.catalog)?;
        info!("Wrote {} catalog entr(ies) to {}", entries, paths.catalog.display());

        Ok(PipelineOutput {
            normalized_csv: paths.normalized_csv.clone(),
            sorted_csv: paths.sorted_csv.clone(),
            aligned_text: paths.aligned_text.clone(),
            catalog: paths.catalog.clone(),
            rows,
            lines,
        })
    }
}

/// Read every record of a headerless CSV file, rows may differ in width
pub(crate) fn read_records(path: &Path, stage: Stage) -> Result<Vec<csv::StringRecord>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::new(stage, e))?;

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PipelineError::new(stage, e))
}

/// Headerless CSV writer over a truncated file
pub(crate) fn csv_writer(path: &Path, stage: Stage) -> Result<csv::Writer<File>, PipelineError> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::new(stage, e))
}

/// Buffered plain-text writer over a truncated file
pub(crate) fn text_writer(path: &Path, stage: Stage) -> Result<BufWriter<File>, PipelineError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| PipelineError::new(stage, e))
}

/// Parse column 0 as a row id; `record` is the 1-based record number
pub(crate) fn row_id(record: &csv::StringRecord, index: usize) -> Result<u64, StageError> {
    let value = record.get(0).unwrap_or_default();
    value.trim().parse::<u64>().map_err(|_| StageError::InvalidRowId {
        record: index + 1,
        value: value.to_string(),
    })
}
