use crate::config::{OutputFormat, Stream};
use crate::core::errors::{CheckerError, Result};
use crate::core::models::Task;
use std::fs::OpenOptions;
use std::io::{self, Write};

enum Sink {
    Csv(csv::Writer<Box<dyn Write + Send>>),
    Jsonl(Box<dyn Write + Send>),
}

/// Durable record of working credentials. Every record is flushed as soon
/// as it is written.
pub struct ResultWriter {
    sink: Sink,
}

impl ResultWriter {
    /// Opens stdout, or a file in append mode so earlier runs are kept.
    pub fn open(target: &Stream, format: OutputFormat) -> Result<Self> {
        let out: Box<dyn Write + Send> = match target {
            Stream::Std => Box::new(io::stdout()),
            Stream::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| CheckerError::Output {
                        path: path.clone(),
                        source,
                    })?;
                Box::new(file)
            }
        };
        Ok(Self::from_writer(out, format))
    }

    pub fn from_writer(out: Box<dyn Write + Send>, format: OutputFormat) -> Self {
        let sink = match format {
            OutputFormat::Csv => Sink::Csv(
                csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(out),
            ),
            OutputFormat::Jsonl => Sink::Jsonl(out),
        };
        Self { sink }
    }

    pub fn record(&mut self, task: &Task) -> Result<()> {
        match &mut self.sink {
            Sink::Csv(writer) => {
                writer
                    .serialize(task)
                    .map_err(|e| CheckerError::Write(e.into()))?;
                writer.flush().map_err(CheckerError::Write)
            }
            Sink::Jsonl(out) => {
                serde_json::to_writer(&mut *out, task).map_err(|e| CheckerError::Write(e.into()))?;
                out.write_all(b"\n").map_err(CheckerError::Write)?;
                out.flush().map_err(CheckerError::Write)
            }
        }
    }
}
