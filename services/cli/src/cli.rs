use crate::commands::{run_pipeline, run_predict};
use clap::{Args, Parser, Subcommand};
use loan_approval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Approval Pipeline",
    about = "Train the loan screening model and predict approvals from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the training pipeline: ingest the dataset, fit the model, write reports
    Pipeline(PipelineArgs),
    /// Predict approval for a single application (default command)
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct PipelineArgs {
    /// Override the configured raw dataset path
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Override the configured reports directory
    #[arg(long)]
    pub(crate) reports: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Applicant income; prompted for when absent
    #[arg(long)]
    pub(crate) income: Option<f64>,
    /// Loan amount; prompted for when absent
    #[arg(long)]
    pub(crate) loan_amount: Option<f64>,
    /// Credit history flag (1 good, 0 bad); prompted for when absent
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub(crate) credit_history: Option<u8>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Predict(PredictArgs::default()));

    match command {
        Command::Pipeline(args) => run_pipeline(args),
        Command::Predict(args) => run_predict(args),
    }
}
