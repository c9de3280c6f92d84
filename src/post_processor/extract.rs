use std::io::Write;
use std::path::Path;

use crate::errors::{PipelineError, Stage};

use super::{read_records, row_id, text_writer};

/// Write the 1-based `column` of sorted rows as plain text, one line per input line
///
/// Row id gaps become blank lines; rows missing the column become blank lines
/// too. When `expected_lines` is given, trailing blank lines pad the output up
/// to it. Returns the number of lines written.
pub fn extract_column<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    column: usize,
    expected_lines: Option<usize>,
) -> Result<usize, PipelineError> {
    let records = read_records(input.as_ref(), Stage::Extract)?;
    let mut writer = text_writer(output.as_ref(), Stage::Extract)?;
    let io_error = |e: std::io::Error| PipelineError::new(Stage::Extract, e);

    let mut prev_row_id = 0u64;
    let mut lines = 0usize;

    for (index, record) in records.iter().enumerate() {
        let id = row_id(record, index).map_err(|e| PipelineError::new(Stage::Extract, e))?;

        for _ in 0..id.saturating_sub(prev_row_id).saturating_sub(1) {
            writer.write_all(b"\n").map_err(io_error)?;
            lines += 1;
        }

        let value = column
            .checked_sub(1)
            .and_then(|i| record.get(i))
            .unwrap_or_default();
        writeln!(writer, "{}", value).map_err(io_error)?;
        lines += 1;

        prev_row_id = prev_row_id.max(id);
    }

    if let Some(expected) = expected_lines {
        while lines < expected {
            writer.write_all(b"\n").map_err(io_error)?;
            lines += 1;
        }
    }

    writer.flush().map_err(io_error)?;
    Ok(lines)
}
