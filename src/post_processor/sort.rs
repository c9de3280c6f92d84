use std::path::Path;

use crate::errors::{PipelineError, Stage};

use super::{csv_writer, read_records, row_id};

/// Stable ascending sort of rows by their numeric row id; returns the row count
pub fn numeric_sort<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize, PipelineError> {
    let records = read_records(input.as_ref(), Stage::Sort)?;

    let mut keyed = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| row_id(&record, index).map(|id| (id, record)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PipelineError::new(Stage::Sort, e))?;

    keyed.sort_by_key(|(id, _)| *id);

    let mut writer = csv_writer(output.as_ref(), Stage::Sort)?;
    for (_, record) in &keyed {
        writer
            .write_record(record)
            .map_err(|e| PipelineError::new(Stage::Sort, e))?;
    }
    writer.flush().map_err(|e| PipelineError::new(Stage::Sort, e))?;

    Ok(keyed.len())
}
