//! Shared library modules providing error types, process execution, and telemetry initialization.

pub mod errors;
pub mod paths;
pub mod process;
pub mod telemetry;
