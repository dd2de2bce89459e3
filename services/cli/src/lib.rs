mod cli;
mod report;
mod run;

use registry_filter::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
