use crate::cli::{CodesArgs, RunArgs};
use crate::report::{render_codes, render_summary};
use registry_filter::config::AppConfig;
use registry_filter::error::AppError;
use registry_filter::pipeline::RegistryPipeline;
use registry_filter::telemetry;
use tracing::info;

pub(crate) fn run_pipeline(args: RunArgs) -> Result<(), AppError> {
    let RunArgs { pipeline, json } = args;

    let mut config = AppConfig::load()?;
    pipeline.apply(&mut config.pipeline);
    telemetry::init(&config.telemetry)?;

    let codes = config.pipeline.classification_codes()?;
    info!(
        establishments = %config.pipeline.establishments_dir.display(),
        companies = %config.pipeline.companies_dir.display(),
        output = %config.pipeline.output_dir.display(),
        batch_size = config.pipeline.batch_size,
        "starting registry filter"
    );

    let summary = RegistryPipeline::new(config.pipeline, codes).run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&summary);
    }

    Ok(())
}

pub(crate) fn list_codes(args: CodesArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.cnae_file {
        config.pipeline.cnae_file = Some(path);
    }

    let codes = config.pipeline.classification_codes()?;
    render_codes(&codes);
    Ok(())
}
