use crate::config::Stream;
use crate::core::errors::{CheckerError, Result};
use crate::core::models::Task;
use std::fs::File;
use std::io::{self, Read};

/// Reads every task from the configured input before the run starts.
pub fn read_tasks(input: &Stream) -> Result<Vec<Task>> {
    match input {
        Stream::Std => parse_tasks(io::stdin().lock()),
        Stream::File(path) => {
            let file = File::open(path).map_err(|source| CheckerError::Input {
                path: path.clone(),
                source,
            })?;
            parse_tasks(file)
        }
    }
}

/// Parses headerless CSV records of exactly three fields.
pub fn parse_tasks<R: Read>(reader: R) -> Result<Vec<Task>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut tasks = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != 3 {
            return Err(CheckerError::MalformedRecord {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
            });
        }
        tasks.push(Task::new(&record[0], &record[1], &record[2]));
    }

    tracing::info!("Loaded {} tasks", tasks.len());
    Ok(tasks)
}
