use crate::cli::{PipelineArgs, PredictArgs};
use crate::infra;
use loan_approval::config::AppConfig;
use loan_approval::domain::{parse_amount, parse_credit_flag, CreditHistory, LoanApplication};
use loan_approval::error::AppError;
use loan_approval::model::ModelArtifact;
use loan_approval::pipeline::{Pipeline, PipelineContext, PipelineError, StepReport};
use loan_approval::prediction::Screener;
use loan_approval::telemetry;
use std::io::{self, BufRead, Write};

const BANNER_WIDTH: usize = 80;

fn print_step_banner(name: &str) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("Completed: {name}");
    println!("{}", "=".repeat(BANNER_WIDTH));
}

fn print_completed(completed: &[StepReport]) {
    for step in completed {
        println!();
        print_step_banner(&step.name);
        println!("{}", step.output);
    }
}

pub(crate) fn run_pipeline(args: PipelineArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(dataset) = args.dataset {
        config.paths.dataset = dataset;
    }
    if let Some(model) = args.model {
        config.paths.model = model;
    }
    if let Some(reports) = args.reports {
        config.paths.reports = reports;
    }

    let ctx = PipelineContext::new(config.paths.clone());
    let mut pipeline = Pipeline::with_steps(infra::standard_steps());

    match pipeline.run(&ctx) {
        Ok(report) => {
            print_completed(&report.completed);
            println!();
            println!("{}", "=".repeat(BANNER_WIDTH));
            println!("Loan Approval Pipeline Completed Successfully!");
            println!("{}", "=".repeat(BANNER_WIDTH));
            println!();
            println!("Results can be found in the following locations:");
            println!("- Processed data: {}", config.paths.processed_dataset().display());
            println!("- Trained model: {}", config.paths.model.display());
            println!(
                "- Feature importance: {}",
                config.paths.feature_importance().display()
            );
            println!(
                "- Confusion matrix: {}",
                config.paths.confusion_matrix().display()
            );
            Ok(())
        }
        Err(PipelineError::StepFailed {
            name,
            failure,
            completed,
        }) => {
            print_completed(&completed);
            println!();
            println!("Error running {name}:");
            if !failure.diagnostics.is_empty() {
                println!("{}", failure.diagnostics);
            }
            Err(AppError::Pipeline(PipelineError::StepFailed {
                name,
                failure,
                completed,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let model_path = args.model.unwrap_or(config.paths.model);
    let artifact = ModelArtifact::load(&model_path)?;
    let screener = Screener::from_artifact(artifact);

    let needs_prompt =
        args.income.is_none() || args.loan_amount.is_none() || args.credit_history.is_none();
    if needs_prompt {
        println!("Enter loan application details:");
        println!("-----------------------------");
    }

    let income = match args.income {
        Some(value) => value,
        None => parse_amount("ApplicantIncome", &prompt("Applicant Income")?)?,
    };
    let loan_amount = match args.loan_amount {
        Some(value) => value,
        None => parse_amount("LoanAmount", &prompt("Loan Amount")?)?,
    };
    let credit_history = match args.credit_history {
        // clap restricts the flag to 0..=1.
        Some(1) => CreditHistory::Good,
        Some(_) => CreditHistory::Bad,
        None => parse_credit_flag(&prompt("Credit History (1 for good, 0 for bad)")?)?,
    };

    let application = LoanApplication::new(income, loan_amount, credit_history);
    let prediction = screener.screen(&application)?;

    println!();
    println!("Prediction Results:");
    println!("------------------");
    println!("Loan Approval: {}", prediction.decision.summary());
    println!(
        "Probability of Approval: {:.2}%",
        prediction.approval_probability() * 100.0
    );
    println!(
        "Probability of Rejection: {:.2}%",
        prediction.rejection_probability() * 100.0
    );

    Ok(())
}

fn prompt(label: &str) -> Result<String, AppError> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
