use std::path::Path;

use crate::errors::{PipelineError, Stage};

use super::{csv_writer, read_records};

/// Pad every row with empty trailing fields up to the widest row; returns that width
pub fn normalize_columns<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize, PipelineError> {
    let records = read_records(input.as_ref(), Stage::Normalize)?;
    let width = records.iter().map(|r| r.len()).max().unwrap_or(0);

    let mut writer = csv_writer(output.as_ref(), Stage::Normalize)?;
    for record in &records {
        let mut padded = record.clone();
        while padded.len() < width {
            padded.push_field("");
        }
        writer
            .write_record(&padded)
            .map_err(|e| PipelineError::new(Stage::Normalize, e))?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::new(Stage::Normalize, e))?;

    Ok(width)
}
