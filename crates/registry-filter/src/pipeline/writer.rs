//! Atomic `;`-delimited output files.
//!
//! Output is written to a temporary file next to the destination and only
//! persisted over it once every row has been flushed, so a failed run never
//! leaves a truncated result behind.

use super::stage::ResultSet;
use super::PipelineError;
use csv::Writer;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub(crate) struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    pub(crate) fn new(final_path: &Path) -> Result<Self, PipelineError> {
        let write_error = |source: std::io::Error| PipelineError::Write {
            path: final_path.to_path_buf(),
            source,
        };

        let parent = match final_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp_file = NamedTempFile::new_in(parent).map_err(write_error)?;

        let writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(temp_file));

        Ok(Self {
            writer,
            final_path: final_path.to_path_buf(),
        })
    }

    pub(crate) fn write_record<I, T>(&mut self, record: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(record)
            .map_err(|source| PipelineError::Csv {
                path: self.final_path.clone(),
                source,
            })
    }

    pub(crate) fn finish(self) -> Result<PathBuf, PipelineError> {
        let write_error = |source: std::io::Error| PipelineError::Write {
            path: self.final_path.clone(),
            source,
        };

        let buffered = self.writer.into_inner().map_err(|err| {
            write_error(std::io::Error::new(err.error().kind(), err.error().to_string()))
        })?;
        let temp_file = buffered
            .into_inner()
            .map_err(|err| write_error(err.into_error()))?;
        temp_file
            .persist(&self.final_path)
            .map_err(|err| write_error(err.error))?;

        Ok(self.final_path)
    }
}

/// Writes the header row followed by every row of `result`.
pub(crate) fn write_result_set(path: &Path, result: &ResultSet) -> Result<PathBuf, PipelineError> {
    let mut writer = AtomicCsvWriter::new(path)?;
    writer.write_record(result.layout().header())?;
    for row in result.rows() {
        writer.write_record(row.values())?;
    }
    writer.finish()
}
