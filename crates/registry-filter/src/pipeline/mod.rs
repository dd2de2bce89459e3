mod classification;
mod companies;
mod establishments;
pub mod layout;
mod normalizer;
mod parser;
mod stage;
mod writer;

pub use classification::ClassificationCodes;
pub use companies::CompanyFilter;
pub use establishments::{EstablishmentFilter, QualifyingKeys, ACTIVE_STATUS};
pub use stage::{FilterOutcome, RecordFilter, ResultSet};

use crate::config::PipelineConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A projected row: one value per field of its layout, in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Value at `index`, or `""` when the row has no such column.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map_or("", String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn update(&mut self, index: usize, normalize: impl FnOnce(&str) -> String) {
        if let Some(value) = self.values.get_mut(index) {
            *value = normalize(value.as_str());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Establishments,
    Companies,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Establishments => write!(f, "establishments"),
            Stage::Companies => write!(f, "companies"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no input files with extension '.{extension}' found for {stage} in {}", dir.display())]
    NoInputFiles {
        stage: Stage,
        dir: PathBuf,
        extension: String,
    },
    #[error("failed to list {}: {source}", dir.display())]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid delimited data in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What one stage produced, for console reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub files_read: usize,
    pub rows_scanned: u64,
    pub rows_matched: u64,
    pub records_written: usize,
    pub output_path: PathBuf,
}

impl StageReport {
    fn new(stage: Stage, outcome: &FilterOutcome, output_path: PathBuf) -> Self {
        Self {
            stage,
            files_read: outcome.files_read,
            rows_scanned: outcome.rows_scanned,
            rows_matched: outcome.rows_matched,
            records_written: outcome.result.len(),
            output_path,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub batch_size: usize,
    pub classification_codes: usize,
    pub establishments: StageReport,
    pub qualifying_keys: usize,
    pub companies: StageReport,
}

/// Establishment stage output together with the key set it closes.
#[derive(Debug, Clone)]
pub struct EstablishmentStage {
    pub report: StageReport,
    pub keys: QualifyingKeys,
}

/// The two-stage establishment → company filter.
#[derive(Debug, Clone)]
pub struct RegistryPipeline {
    config: PipelineConfig,
    codes: ClassificationCodes,
}

impl RegistryPipeline {
    pub fn new(config: PipelineConfig, codes: ClassificationCodes) -> Self {
        Self { config, codes }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn codes(&self) -> &ClassificationCodes {
        &self.codes
    }

    /// Runs both stages. The establishment output is on disk before the
    /// company directory is even listed, so it survives a company-stage
    /// failure.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now();

        let EstablishmentStage { report, keys } = self.filter_establishments()?;
        let companies = self.filter_companies(&keys)?;

        Ok(RunSummary {
            started_at,
            finished_at: Utc::now(),
            batch_size: self.config.batch_size,
            classification_codes: self.codes.len(),
            establishments: report,
            qualifying_keys: keys.len(),
            companies,
        })
    }

    pub fn filter_establishments(&self) -> Result<EstablishmentStage, PipelineError> {
        let files = self.input_files(Stage::Establishments, &self.config.establishments_dir)?;
        info!(
            files = files.len(),
            codes = self.codes.len(),
            "filtering establishments"
        );

        let outcome =
            EstablishmentFilter::new(&self.codes).filter_files(&files, self.config.batch_size)?;
        self.prepare_output_dir()?;
        let output_path =
            writer::write_result_set(&self.config.establishments_output(), &outcome.result)?;
        let keys = QualifyingKeys::from_establishments(&outcome.result);

        let report = StageReport::new(Stage::Establishments, &outcome, output_path);
        info!(
            records = report.records_written,
            unique_base_ids = keys.len(),
            output = %report.output_path.display(),
            "establishment stage complete"
        );

        Ok(EstablishmentStage { report, keys })
    }

    pub fn filter_companies(&self, keys: &QualifyingKeys) -> Result<StageReport, PipelineError> {
        let files = self.input_files(Stage::Companies, &self.config.companies_dir)?;

        let filter = CompanyFilter::new(keys);
        let outcome = if keys.is_empty() {
            warn!("no qualifying establishments; company files are not scanned");
            FilterOutcome {
                result: ResultSet::new(filter.layout()),
                files_read: 0,
                rows_scanned: 0,
                rows_matched: 0,
            }
        } else {
            info!(files = files.len(), keys = keys.len(), "filtering companies");
            filter.filter_files(&files, self.config.batch_size)?
        };

        self.prepare_output_dir()?;
        let output_path =
            writer::write_result_set(&self.config.companies_output(), &outcome.result)?;
        let report = StageReport::new(Stage::Companies, &outcome, output_path);
        info!(
            records = report.records_written,
            output = %report.output_path.display(),
            "company stage complete"
        );

        Ok(report)
    }

    fn prepare_output_dir(&self) -> Result<(), PipelineError> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::Write {
            path: dir.clone(),
            source,
        })
    }

    fn input_files(&self, stage: Stage, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let files = parser::discover_input_files(dir, &self.config.file_extension)?;
        if files.is_empty() {
            return Err(PipelineError::NoInputFiles {
                stage,
                dir: dir.to_path_buf(),
                extension: self.config.file_extension.clone(),
            });
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_get_is_total() {
        let record = Record::new(vec!["a".to_string()]);
        assert_eq!(record.get(0), "a");
        assert_eq!(record.get(7), "");
    }

    #[test]
    fn record_update_ignores_out_of_range_columns() {
        let mut record = Record::new(vec!["1".to_string()]);
        record.update(0, |value| format!("0{value}"));
        record.update(3, |_| "ignored".to_string());
        assert_eq!(record.values(), ["01".to_string()]);
    }

    #[test]
    fn no_input_files_error_names_stage_and_directory() {
        let err = PipelineError::NoInputFiles {
            stage: Stage::Companies,
            dir: PathBuf::from("dados_brutos/dados_empresas"),
            extension: "csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no input files with extension '.csv' found for companies in dados_brutos/dados_empresas"
        );
    }
}
