/*!
 * Gettext catalog generation from the sorted CSV.
 *
 * Each row with at least two fields becomes one fuzzy entry: the zero-padded
 * row id is the context, column 1 the message id, column 2 the translation.
 * Further non-empty columns are carried as translator comments.
 */

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::errors::{PipelineError, Stage};

use super::{read_records, row_id, text_writer};

const HEADER: &str = "msgid \"\"\n\
msgstr \"\"\n\
\"Content-Type: text/plain; charset=UTF-8\\n\"\n\
\"Content-Transfer-Encoding: 8bit\\n\"\n";

/// Comments longer than this get a continuation marker line
const LONG_COMMENT_CHARS: usize = 120;
const CONTINUATION_MARKER: &str = "#\u{200C}";

/// One catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    /// Zero-padded row id
    pub msgctxt: String,
    pub msgid: String,
    pub msgstr: String,
    /// Comment lines, each already prefixed with `#`
    pub comments: Vec<String>,
}

impl PoEntry {
    /// Build an entry from a CSV record: `[row_id, original, translation, extra...]`
    pub fn from_record(row_id: u64, record: &csv::StringRecord) -> Self {
        let mut comments = Vec::new();
        for extra in record.iter().skip(3).filter(|field| !field.is_empty()) {
            comments.push(format!("# {}", extra));
            if extra.chars().count() > LONG_COMMENT_CHARS {
                comments.push(CONTINUATION_MARKER.to_string());
            }
        }

        Self {
            msgctxt: format!("{:08}", row_id),
            msgid: escape(record.get(1).unwrap_or_default()),
            msgstr: escape(record.get(2).unwrap_or_default()),
            comments,
        }
    }
}

impl fmt::Display for PoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            writeln!(f, "{}", comment)?;
        }
        writeln!(f, "#, fuzzy")?;
        writeln!(f, "msgctxt \"{}\"", self.msgctxt)?;
        writeln!(f, "msgid \"{}\"", self.msgid)?;
        writeln!(f, "msgstr \"{}\"", self.msgstr)
    }
}

/// Make text safe inside a quoted catalog string; `"` becomes `'`
pub fn escape(text: &str) -> String {
    text.replace('"', "'")
}

/// Write the catalog for a sorted CSV; returns the number of entries
pub fn csv_to_po<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize, PipelineError> {
    let records = read_records(input.as_ref(), Stage::Catalog)?;

    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.len() < 2 {
            continue;
        }
        let id = row_id(record, index).map_err(|e| PipelineError::new(Stage::Catalog, e))?;
        entries.push(PoEntry::from_record(id, record));
    }

    let mut writer = text_writer(output.as_ref(), Stage::Catalog)?;
    let io_error = |e: std::io::Error| PipelineError::new(Stage::Catalog, e);

    write!(writer, "{}", HEADER).map_err(io_error)?;
    for entry in &entries {
        write!(writer, "\n{}", entry).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)?;

    Ok(entries.len())
}
