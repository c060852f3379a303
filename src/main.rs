//! Runs one training job described by a properties file.
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minilabels::{
    Error,
    Properties,
    Result,
    SampleReader,
    TrainingConfig,
    TrainingController,
};

use std::path::PathBuf;
use std::process::ExitCode;

const FULL_WIDTH: usize = 60;
const KEY_WIDTH: usize = 24;


#[derive(Parser)]
#[command(name = "minilabels")]
#[command(about = "Train a collective multi-label CRF")]
#[command(version)]
struct Cli {
    /// Path to the properties file
    config: PathBuf,
}


fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minilabels=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "training failed");
            eprintln!("{} {e}", "error:".bold().red());
            ExitCode::FAILURE
        },
    }
}


fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(
            e.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) => e.exit(),
        Err(e) => return Err(Error::Usage(e.to_string())),
    };

    let properties = Properties::from_file(&cli.config)?;
    print_properties(&properties);
    let config = TrainingConfig::from_properties(&properties)?;

    let train = SampleReader::new()
        .file(&config.train_data)
        .read()?;
    let (_, n_features) = train.shape();
    let test = SampleReader::new()
        .file(&config.test_data)
        .n_classes(train.n_classes())
        .n_features(n_features)
        .read()?;

    let outcome = TrainingController::new(config)
        .on_snapshot(|snapshot| println!("{snapshot}"))
        .run(&train, &test)?;

    println!();
    println!();
    println!("{}", outcome.report);
    Ok(())
}


fn print_properties(properties: &Properties) {
    let header = format!(
        "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
        "", "CONFIG".bold(), "",
    );
    println!("\n{header}");
    for line in properties.to_string().lines() {
        let (key, value) = line.split_once(" = ").unwrap_or((line, ""));
        println!(
            "+ {:<KEY_WIDTH$}\t{}",
            key.bold(),
            value.bold().green(),
        );
    }
    println!("{:=>FULL_WIDTH$}\n", "");
}
