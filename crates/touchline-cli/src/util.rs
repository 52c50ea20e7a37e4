use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use touchline_analytics::clustering::Centroid;
use tracing::{debug, info};

use crate::schema::{cluster::PointInput, rank::RecordInput};

/// Writes pretty-printed JSON reports to stdout or to a file.
pub struct ReportWriter {
    writer: Box<dyn Write>,
    target: String,
}

impl ReportWriter {
    /// Opens `path` for writing, or stdout when `path` is `None`.
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                target: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            target: path.display().to_string(),
        })
    }

    /// Writes `report` followed by a newline and flushes the destination.
    pub fn write_report<T>(mut self, report: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, report)
            .with_context(|| format!("Failed to write JSON to {}", self.target))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to finish output to {}", self.target))?;
        info!(destination = %self.target, "report written");
        Ok(())
    }
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file)).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    debug!(kind = file_kind, path = %path.display(), "input loaded");
    Ok(value)
}

/// Reads a JSON array of labelled, scored records.
pub fn read_records_file(path: &Path) -> anyhow::Result<Vec<RecordInput>> {
    read_json_file("records", path)
}

/// Reads a JSON array of pitch points.
pub fn read_points_file(path: &Path) -> anyhow::Result<Vec<PointInput>> {
    read_json_file("points", path)
}

/// Reads a JSON array of initial centroids.
pub fn read_centroids_file(path: &Path) -> anyhow::Result<Vec<Centroid>> {
    read_json_file("centroids", path)
}
