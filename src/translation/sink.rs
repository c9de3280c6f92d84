/*!
 * Single-consumer CSV writer for translated rows.
 *
 * Workers send finished records over an `mpsc` channel; one spawned task owns
 * the `csv::Writer`, writes each record in arrival order and flushes it, so a
 * cancelled or crashed run keeps every row that reached the file.
 */

use log::{debug, error};
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::TranslationError;

const CHANNEL_CAPACITY: usize = 100;

/// One CSV record: row id, original text, primary translation, extra segments
pub type Record = Vec<String>;

/// Sending side handed to workers
#[derive(Debug, Clone)]
pub struct RowSender {
    tx: mpsc::Sender<Record>,
}

impl RowSender {
    /// Queue a record for writing
    pub async fn send(&self, record: Record) -> Result<(), TranslationError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| TranslationError::SinkClosed("writer task has stopped".to_string()))
    }
}

/// Handle to the writer task
#[derive(Debug)]
pub struct ResultSink {
    path: PathBuf,
    tx: mpsc::Sender<Record>,
    task: JoinHandle<Result<usize, csv::Error>>,
}

impl ResultSink {
    /// Truncate or create `path` and start the writer task
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TranslationError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            TranslationError::SinkClosed(format!("cannot create {}: {}", path.display(), e))
        })?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(write_rows(writer, rx));

        debug!("Result sink writing to {}", path.display());
        Ok(Self { path, tx, task })
    }

    /// File being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// New sender for a worker
    pub fn sender(&self) -> RowSender {
        RowSender { tx: self.tx.clone() }
    }

    /// Close the channel, wait for every queued row, and return the number written
    pub async fn finish(self) -> Result<usize, TranslationError> {
        let Self { path, tx, task } = self;
        drop(tx);

        let written = task
            .await
            .map_err(|e| TranslationError::SinkClosed(format!("writer task failed: {}", e)))?
            .map_err(|e| TranslationError::SinkClosed(format!("write to {} failed: {}", path.display(), e)))?;

        debug!("Result sink closed after {} row(s)", written);
        Ok(written)
    }
}

async fn write_rows(mut writer: csv::Writer<File>, mut rx: mpsc::Receiver<Record>) -> Result<usize, csv::Error> {
    let mut written = 0;

    while let Some(record) = rx.recv().await {
        if let Err(e) = writer.write_record(&record).and_then(|_| writer.flush().map_err(csv::Error::from)) {
            error!("Failed to write row {}: {}", record.first().map(String::as_str).unwrap_or("?"), e);
            rx.close();
            return Err(e);
        }
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
