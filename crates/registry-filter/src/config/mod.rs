use crate::pipeline::ClassificationCodes;
use std::env;
use std::path::{Path, PathBuf};

pub const ESTABLISHMENTS_OUTPUT_FILE: &str = "estabelecimentos_filtrados.csv";
pub const COMPANIES_OUTPUT_FILE: &str = "empresas_filtradas.csv";
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Top-level configuration for a filter run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_dir = env::var("REGISTRY_BASE_DIR").unwrap_or_else(|_| ".".to_string());
        let mut pipeline = PipelineConfig::rooted_at(Path::new(&base_dir));

        if let Some(dir) = env_path("REGISTRY_ESTABLISHMENTS_DIR") {
            pipeline.establishments_dir = dir;
        }
        if let Some(dir) = env_path("REGISTRY_COMPANIES_DIR") {
            pipeline.companies_dir = dir;
        }
        if let Some(dir) = env_path("REGISTRY_OUTPUT_DIR") {
            pipeline.output_dir = dir;
        }
        if let Ok(extension) = env::var("REGISTRY_FILE_EXTENSION") {
            pipeline.file_extension = normalize_extension(&extension);
        }
        if let Ok(raw) = env::var("REGISTRY_BATCH_SIZE") {
            pipeline.batch_size = parse_batch_size(&raw)?;
        }
        pipeline.cnae_file = env_path("REGISTRY_CNAE_FILE");

        let log_level = env::var("REGISTRY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            pipeline,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Input/output locations and read tuning for the two filter stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub establishments_dir: PathBuf,
    pub companies_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Input files are matched as `*.<file_extension>`.
    pub file_extension: String,
    pub batch_size: usize,
    /// Replaces the built-in CNAE list when set.
    pub cnae_file: Option<PathBuf>,
}

impl PipelineConfig {
    /// The registry's conventional layout under `base_dir`.
    pub fn rooted_at(base_dir: &Path) -> Self {
        let raw = base_dir.join("dados_brutos");
        Self {
            establishments_dir: raw.join("dados_estabelecimentos"),
            companies_dir: raw.join("dados_empresas"),
            output_dir: base_dir.join("dados_filtrados"),
            file_extension: "csv".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            cnae_file: None,
        }
    }

    pub fn establishments_output(&self) -> PathBuf {
        self.output_dir.join(ESTABLISHMENTS_OUTPUT_FILE)
    }

    pub fn companies_output(&self) -> PathBuf {
        self.output_dir.join(COMPANIES_OUTPUT_FILE)
    }

    pub fn classification_codes(&self) -> Result<ClassificationCodes, ConfigError> {
        match &self.cnae_file {
            Some(path) => ClassificationCodes::from_path(path),
            None => Ok(ClassificationCodes::standard()),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new("."))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("REGISTRY_BATCH_SIZE must be a positive integer, got '{value}'")]
    InvalidBatchSize { value: String },
    #[error("failed to read CNAE list {}: {source}", path.display())]
    CodeFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{line}: '{value}' is not a 7-digit CNAE code", path.display())]
    InvalidCode {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("CNAE list {} contains no codes", path.display())]
    EmptyCodeFile { path: PathBuf },
}

pub fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidBatchSize {
            value: raw.to_string(),
        }),
    }
}

/// Accepts `csv`, `.csv` and surrounding whitespace.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_string()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
