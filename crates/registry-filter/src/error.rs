use crate::config::ConfigError;
use crate::pipeline::PipelineError;
use crate::telemetry::TelemetryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("failed to render summary: {0}")]
    Summary(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit status for the binary: configuration problems are
    /// distinguished from failed runs.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Telemetry(_) => 2,
            AppError::Pipeline(_) | AppError::Summary(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use std::path::PathBuf;

    #[test]
    fn missing_input_is_a_failed_run() {
        let err = AppError::from(PipelineError::NoInputFiles {
            stage: Stage::Establishments,
            dir: PathBuf::from("in"),
            extension: "csv".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("pipeline error: no input files"));
    }

    #[test]
    fn bad_configuration_exits_with_usage_code() {
        let err = AppError::from(ConfigError::InvalidBatchSize {
            value: "0".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
    }
}
