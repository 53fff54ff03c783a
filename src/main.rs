// src/main.rs

use std::process::ExitCode;

use snapctl::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("snapctl error: {err:#}");
        return ExitCode::from(2);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "snapctl failed");
            eprintln!("snapctl error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
