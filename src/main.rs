//! Entry point for Fold Launcher.
use std::process::ExitCode;

use clap::Parser;
use fold_launcher::{
    cli::{execute_launch, LaunchArgs, LaunchExit},
    lib::telemetry,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), LaunchExit> {
    telemetry::init_tracing().map_err(LaunchExit::from_error)?;
    let args = LaunchArgs::parse();
    let profile = args.into_profile().map_err(LaunchExit::from_error)?;

    if let Some(message) = execute_launch(profile)
        .await
        .map_err(LaunchExit::from_error)?
    {
        println!("{message}");
    }
    Ok(())
}
