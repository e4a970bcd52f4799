mod cli;
mod commands;
pub mod infra;

use loan_approval::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
