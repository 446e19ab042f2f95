use std::process::ExitCode;

use anyhow::Error;

/// Bundles a launch error message with the process exit code.
#[derive(Debug)]
pub struct LaunchExit {
    message: String,
    exit_code: ExitCode,
}

impl LaunchExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("Error: {err}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Print the message to stdout and hand back the exit code.
    pub fn report(self) -> ExitCode {
        println!("{}", self.message);
        self.exit_code
    }
}
