use crate::run::{list_codes, run_pipeline};
use clap::{Args, Parser, Subcommand};
use registry_filter::config::{normalize_extension, PipelineConfig};
use registry_filter::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "registry-filter",
    about = "Select active establishments by CNAE and their companies from the public CNPJ registry dumps",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter establishments, then companies (default command)
    Run(RunArgs),
    /// Print the CNAE codes an establishment must carry to be selected
    Codes(CodesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct PipelineArgs {
    /// Directory holding the establishment files
    #[arg(long)]
    pub(crate) establishments_dir: Option<PathBuf>,
    /// Directory holding the company files
    #[arg(long)]
    pub(crate) companies_dir: Option<PathBuf>,
    /// Directory receiving the filtered files (created if absent)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Extension of the input files, without the dot
    #[arg(long)]
    pub(crate) extension: Option<String>,
    /// Rows read per batch
    #[arg(long, value_parser = parse_batch_size)]
    pub(crate) batch_size: Option<usize>,
    /// Text file with one CNAE code per line, replacing the built-in list
    #[arg(long)]
    pub(crate) cnae_file: Option<PathBuf>,
}

impl PipelineArgs {
    pub(crate) fn apply(self, config: &mut PipelineConfig) {
        if let Some(dir) = self.establishments_dir {
            config.establishments_dir = dir;
        }
        if let Some(dir) = self.companies_dir {
            config.companies_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(extension) = self.extension {
            config.file_extension = normalize_extension(&extension);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(path) = self.cnae_file {
            config.cnae_file = Some(path);
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CodesArgs {
    /// Text file with one CNAE code per line, replacing the built-in list
    #[arg(long)]
    pub(crate) cnae_file: Option<PathBuf>,
}

fn parse_batch_size(raw: &str) -> Result<usize, String> {
    registry_filter::config::parse_batch_size(raw).map_err(|err| err.to_string())
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => run_pipeline(args),
        Command::Codes(args) => list_codes(args),
    }
}
