//! Record Sinks
//!
//! The importer never persists anything itself. Produced records are handed
//! to a [`RecordSink`] one at a time, in parse order, so each record's
//! outcome can be reported individually.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::ingestion::ttrpg::ImportRecord;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Destination for imported records.
///
/// # Example
///
/// ```
/// use sotdl_import::core::sink::{create_records, JsonLinesSink};
/// use sotdl_import::ingestion::ttrpg::{run_import, ContentKind, ImportOptions};
///
/// let outcome = run_import(ContentKind::Talent, "Tough º +5 Health.", ImportOptions::default());
/// let mut sink = JsonLinesSink::new(Vec::new(), false);
/// let results = create_records(&mut sink, &outcome.records, Some("folder01"));
/// assert!(results.iter().all(|r| r.created));
/// ```
pub trait RecordSink {
    /// Store one record, optionally inside the destination folder.
    fn create(&mut self, record: &ImportRecord, folder: Option<&str>) -> Result<()>;

    /// Flush anything buffered. Called once after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Used for logging. Default is "unknown".
    fn name(&self) -> &str {
        "unknown"
    }
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn create(&mut self, record: &ImportRecord, folder: Option<&str>) -> Result<()> {
        (**self).create(record, folder)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// JSON Lines
// ============================================================================

/// Writes each record as one JSON document followed by a newline.
///
/// With `pretty` set the documents span several lines; they still parse as
/// a stream of concatenated JSON values.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn create(&mut self, record: &ImportRecord, folder: Option<&str>) -> Result<()> {
        let mut value = serde_json::to_value(record)?;
        if let (Some(folder), Value::Object(map)) = (folder, &mut value) {
            map.insert("folder".to_string(), Value::String(folder.to_string()));
        }

        let mut line = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        line.push(b'\n');
        self.writer.write_all(&line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json-lines"
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Outcome of storing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub name: String,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Hand every record to `sink` in order and report each outcome.
///
/// A failing record does not stop the ones after it. If the final flush
/// fails, every record written so far is reported as not created.
pub fn create_records<S: RecordSink + ?Sized>(
    sink: &mut S,
    records: &[ImportRecord],
    folder: Option<&str>,
) -> Vec<RecordOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let name = record.name().to_string();
        match sink.create(record, folder) {
            Ok(()) => {
                log::info!("Created '{}' via {}", name, sink.name());
                outcomes.push(RecordOutcome {
                    name,
                    created: true,
                    error: None,
                });
            }
            Err(e) => {
                log::error!("Failed to create '{}' via {}: {}", name, sink.name(), e);
                outcomes.push(RecordOutcome {
                    name,
                    created: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if let Err(e) = sink.finish() {
        log::error!("Failed to flush {}: {}", sink.name(), e);
        let message = e.to_string();
        for outcome in outcomes.iter_mut().filter(|o| o.created) {
            outcome.created = false;
            outcome.error = Some(message.clone());
        }
    }
    outcomes
}
